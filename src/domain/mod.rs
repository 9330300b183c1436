//! Domain primitives: currency, arena ids, squares, cards and decks.

pub mod ids;
pub mod money;
pub mod square;

pub use ids::{ColourSet, EntityId, PropertyId, RunId};
pub use money::Money;
pub use square::{
    BoardLayout, Card, CardEffect, Deck, PurchaseTerms, Square, SquareKind, StreetTerms,
};
