pub mod behavior;
pub mod config;
pub mod decision;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod rng;
pub mod snapshot;

pub use behavior::{Behavior, BehaviorKind, Personality};
pub use config::{ConfigError, GameConfig, PlayerSpec, Players};
pub use decision::{Decision, DecisionOutputs};
pub use domain::{
    BoardLayout, Card, CardEffect, ColourSet, Deck, EntityId, Money, PropertyId, PurchaseTerms,
    RunId, Square, SquareKind, StreetTerms,
};
pub use engine::{Entity, EntityKind, Exposure, Game, HouseHotelPool, PlayOutcome, PropertyState};
pub use error::RuleViolation;
pub use ledger::{Account, Ledger, Transaction};
pub use rng::{Randomizer, StdRandomizer};
pub use snapshot::{GameSnapshot, PlayerSnapshot};
