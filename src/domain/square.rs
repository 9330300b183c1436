//! Board squares, card decks and the static layout supplied at construction.
//!
//! The layout is plain data: a fixed sequence of typed squares plus the two
//! card decks. The engine interprets it; nothing here carries behaviour.

use serde::{Deserialize, Serialize};

use super::{ColourSet, Money};
use crate::rng::{shuffle, Randomizer};

/// Purchase terms shared by every ownable square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseTerms {
    /// Face value: the price when bought unowned.
    pub value: Money,
    /// Cash credited to the owner when the property is mortgaged.
    pub mortgage_value: Money,
}

/// Development terms for a street.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetTerms {
    /// Rent by development level: 0 houses, 1–4 houses, hotel.
    pub rent: [Money; 6],
    pub house_cost: Money,
    pub hotel_cost: Money,
    pub set: ColourSet,
}

/// The closed set of square kinds the turn engine can interpret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquareKind {
    Go,
    Street {
        terms: PurchaseTerms,
        street: StreetTerms,
    },
    Station {
        terms: PurchaseTerms,
    },
    Utility {
        terms: PurchaseTerms,
    },
    Tax {
        amount: Money,
    },
    Chance,
    CommunityChest,
    FreeParking,
    Jail,
    GoToJail,
}

/// One square of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub name: String,
    pub kind: SquareKind,
}

impl Square {
    pub fn new(name: impl Into<String>, kind: SquareKind) -> Self {
        Square {
            name: name.into(),
            kind,
        }
    }

    /// Purchase terms, for the three ownable kinds.
    pub fn purchase_terms(&self) -> Option<&PurchaseTerms> {
        match &self.kind {
            SquareKind::Street { terms, .. }
            | SquareKind::Station { terms }
            | SquareKind::Utility { terms } => Some(terms),
            _ => None,
        }
    }

    pub fn street_terms(&self) -> Option<&StreetTerms> {
        match &self.kind {
            SquareKind::Street { street, .. } => Some(street),
            _ => None,
        }
    }

    pub fn is_purchasable(&self) -> bool {
        self.purchase_terms().is_some()
    }
}

/// What a drawn card does. The card text itself is presentation data; the
/// engine only interprets the effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Move forward to the named square, crossing GO on the way if applicable.
    AdvanceTo(String),
    /// Move back the given number of squares.
    GoBack(u32),
    /// Move back to the named square without crossing GO.
    GoBackTo(String),
    ReceiveFromBank(Money),
    PayBank(Money),
    PayPot(Money),
    /// Pay the pot per house and per hotel across the player's portfolio.
    Repairs {
        per_house: Money,
        per_hotel: Money,
    },
    /// Every other active player pays the drawer.
    CollectFromEachPlayer(Money),
    JailFree,
    GoToJail,
}

/// A single deck card: display name plus interpreted effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub effect: CardEffect,
}

impl Card {
    pub fn new(name: impl Into<String>, effect: CardEffect) -> Self {
        Card {
            name: name.into(),
            effect,
        }
    }
}

/// A shuffle-on-exhaustion card queue.
///
/// Drawing from an empty queue reshuffles the full deck, so the sequence is
/// infinite and never signals emptiness (unless the deck itself has no cards).
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    queue: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Deck {
            cards,
            queue: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw the next card, reshuffling the full deck when the queue runs out.
    /// Returns `None` only for a deck with no cards at all.
    pub fn draw(&mut self, rng: &mut dyn Randomizer) -> Option<Card> {
        if self.queue.is_empty() {
            self.queue = self.cards.clone();
            shuffle(rng, &mut self.queue);
        }
        self.queue.pop()
    }
}

/// The static inputs to a game: the board and both decks.
#[derive(Debug, Clone)]
pub struct BoardLayout {
    pub squares: Vec<Square>,
    pub chance: Vec<Card>,
    pub community_chest: Vec<Card>,
}
