//! The game engine: entity/property arenas, settlement, and orchestration.
//!
//! `Game` owns every mutable table: entities, property states, the shared
//! house/hotel pool, the decks and the ledger. All cross-references are
//! integer ids, so a forecast clone is a plain copy of the tables.

pub mod forecast;
pub mod property;
pub mod turn;

pub use forecast::Exposure;
pub use turn::PlayOutcome;

use std::collections::BTreeSet;

use crate::behavior::{BehaviorKind, Personality};
use crate::config::{ConfigError, GameConfig, PlayerSpec, Players};
use crate::decision::Decision;
use crate::domain::{
    BoardLayout, CardEffect, Deck, EntityId, Money, PropertyId, RunId, Square, SquareKind,
};
use crate::error::RuleViolation;
use crate::ledger::{Account, Ledger, Transaction};
use crate::rng::Randomizer;

const PLAYER_NAMES: [&str; 18] = [
    "Andy", "Brian", "Katie", "Cathy", "Tine", "Jody", "James", "Ryan", "Lucy", "Pierre", "Olu",
    "Gregor", "Tracy", "Lia", "Andoni", "Ralph", "San", "Omar",
];

/// What an entity is. The bank and the free-parking pot take part in the
/// ledger like players do, but are never eliminated and never act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Bank,
    FreeParkingPot,
    Player,
}

/// One participant in the ledger: the bank, the pot, or a player.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    pub account: Account,
    pub owned: Vec<PropertyId>,
    pub behavior: BehaviorKind,
    pub personality: Personality,
    /// Board index of the current square.
    pub position: usize,
    pub in_game: bool,
    pub in_jail: bool,
    pub turns_in_jail: u32,
    pub jail_free_cards: u32,
    /// Names of every square visited, in order.
    pub history: Vec<String>,
}

impl Entity {
    fn new(name: String, kind: EntityKind, balance: Money, behavior: BehaviorKind) -> Self {
        Entity {
            name,
            kind,
            account: Account::new(balance),
            owned: Vec::new(),
            behavior,
            personality: Personality::balanced(),
            position: 0,
            in_game: true,
            in_jail: false,
            turns_in_jail: 0,
            jail_free_cards: 0,
            history: Vec::new(),
        }
    }

    pub fn balance(&self) -> Money {
        self.account.balance()
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }
}

/// Runtime state of one ownable square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyState {
    /// Board index of the square this state belongs to.
    pub square: usize,
    pub owner: Option<EntityId>,
    pub mortgaged: bool,
    pub houses: u8,
    pub hotels: u8,
}

/// The game-wide supply of houses and hotels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseHotelPool {
    pub houses: u8,
    pub hotels: u8,
}

pub struct Game {
    pub(crate) board: Vec<Square>,
    /// Board index -> property table index, for ownable squares.
    pub(crate) square_property: Vec<Option<PropertyId>>,
    pub(crate) properties: Vec<PropertyState>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) bank: EntityId,
    pub(crate) pot: EntityId,
    pub(crate) player_ids: Vec<EntityId>,
    pub(crate) pool: HouseHotelPool,
    pub(crate) chance: Deck,
    pub(crate) community_chest: Deck,
    pub(crate) ledger: Ledger,
    pub(crate) turn: u32,
    pub(crate) last_roll: u32,
    pub(crate) completed: bool,
    pub(crate) go_index: Option<usize>,
    pub(crate) jail_index: Option<usize>,
    pub(crate) go_amount: Money,
    pub(crate) jail_fine: Money,
    pub(crate) max_turns_in_jail: u32,
    pub(crate) num_dice: u32,
    pub(crate) die_size: u32,
    /// Which ledger partition this game writes to. `Real` for the live game,
    /// a forecast id inside simulation clones.
    pub(crate) run: RunId,
    pub(crate) next_forecast_run: u32,
    pub(crate) rng: Box<dyn Randomizer>,
}

impl Game {
    /// Build a game from its configuration and the externally supplied board
    /// layout. Configuration problems are fatal here; nothing else is.
    pub fn new(
        config: GameConfig,
        layout: BoardLayout,
        mut rng: Box<dyn Randomizer>,
    ) -> Result<Game, ConfigError> {
        config.validate()?;
        Self::validate_layout(&layout)?;

        let BoardLayout {
            squares,
            chance,
            community_chest,
        } = layout;

        let mut square_property = Vec::with_capacity(squares.len());
        let mut properties = Vec::new();
        for (index, square) in squares.iter().enumerate() {
            if square.is_purchasable() {
                properties.push(PropertyState {
                    square: index,
                    owner: None,
                    mortgaged: false,
                    houses: 0,
                    hotels: 0,
                });
                square_property.push(Some(PropertyId(properties.len() - 1)));
            } else {
                square_property.push(None);
            }
        }

        let go_index = squares.iter().position(|s| s.kind == SquareKind::Go);
        let jail_index = squares.iter().position(|s| s.kind == SquareKind::Jail);

        let mut entities = vec![
            Entity::new(
                "Bank".to_string(),
                EntityKind::Bank,
                config.bank_balance,
                BehaviorKind::Passive,
            ),
            Entity::new(
                "Free Parking".to_string(),
                EntityKind::FreeParkingPot,
                config.free_parking_balance,
                BehaviorKind::Passive,
            ),
        ];
        let bank = EntityId(0);
        let pot = EntityId(1);

        let specs: Vec<PlayerSpec> = match &config.players {
            Players::Roster(specs) => specs.clone(),
            Players::Count(n) => {
                let offset = rng.uniform(0, PLAYER_NAMES.len() as u32 - 1) as usize;
                (0..*n as usize)
                    .map(|i| PlayerSpec::new(PLAYER_NAMES[(offset + i) % PLAYER_NAMES.len()]))
                    .collect()
            }
        };

        let mut player_ids = Vec::with_capacity(specs.len());
        for spec in specs {
            let mut player = Entity::new(
                spec.name,
                EntityKind::Player,
                config.starting_balance,
                spec.behavior,
            );
            player.personality = spec
                .personality
                .unwrap_or_else(|| Personality::random(rng.as_mut()));
            player.jail_free_cards = spec.jail_free_cards;
            player_ids.push(EntityId(entities.len()));
            entities.push(player);
        }

        Ok(Game {
            board: squares,
            square_property,
            properties,
            entities,
            bank,
            pot,
            player_ids,
            pool: HouseHotelPool {
                houses: config.num_houses,
                hotels: config.num_hotels,
            },
            chance: Deck::new(chance),
            community_chest: Deck::new(community_chest),
            ledger: Ledger::new(),
            turn: 0,
            last_roll: 0,
            completed: false,
            go_index,
            jail_index,
            go_amount: config.go_amount,
            jail_fine: config.jail_fine,
            max_turns_in_jail: config.max_turns_in_jail,
            num_dice: config.num_dice,
            die_size: config.die_size,
            run: RunId::Real,
            next_forecast_run: 0,
            rng,
        })
    }

    fn validate_layout(layout: &BoardLayout) -> Result<(), ConfigError> {
        if layout.squares.is_empty() {
            return Err(ConfigError::EmptyBoard);
        }

        let names: BTreeSet<&str> = layout.squares.iter().map(|s| s.name.as_str()).collect();
        let has_jail = layout
            .squares
            .iter()
            .any(|s| s.kind == SquareKind::Jail);
        let mut needs_jail = layout
            .squares
            .iter()
            .any(|s| s.kind == SquareKind::GoToJail);

        for card in layout.chance.iter().chain(layout.community_chest.iter()) {
            match &card.effect {
                CardEffect::AdvanceTo(target) | CardEffect::GoBackTo(target) => {
                    if !names.contains(target.as_str()) {
                        return Err(ConfigError::UnknownCardTarget(target.clone()));
                    }
                }
                CardEffect::GoToJail => needs_jail = true,
                _ => {}
            }
        }

        if needs_jail && !has_jail {
            return Err(ConfigError::MissingSquare("Jail".to_string()));
        }

        let draws_chance = layout
            .squares
            .iter()
            .any(|s| s.kind == SquareKind::Chance);
        if draws_chance && layout.chance.is_empty() {
            return Err(ConfigError::EmptyDeck("chance"));
        }
        let draws_chest = layout
            .squares
            .iter()
            .any(|s| s.kind == SquareKind::CommunityChest);
        if draws_chest && layout.community_chest.is_empty() {
            return Err(ConfigError::EmptyDeck("community chest"));
        }

        Ok(())
    }

    // --- accessors -----------------------------------------------------

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0]
    }

    pub fn balance(&self, id: EntityId) -> Money {
        self.entities[id.0].balance()
    }

    pub fn bank(&self) -> EntityId {
        self.bank
    }

    pub fn free_parking_pot(&self) -> EntityId {
        self.pot
    }

    pub fn players(&self) -> &[EntityId] {
        &self.player_ids
    }

    pub fn active_players(&self) -> Vec<EntityId> {
        self.player_ids
            .iter()
            .copied()
            .filter(|id| self.entities[id.0].in_game)
            .collect()
    }

    pub fn board(&self) -> &[Square] {
        &self.board
    }

    pub fn square(&self, index: usize) -> &Square {
        &self.board[index]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyState {
        &self.properties[id.0]
    }

    pub fn property_at(&self, square: usize) -> Option<PropertyId> {
        self.square_property[square]
    }

    pub fn property_square(&self, id: PropertyId) -> &Square {
        &self.board[self.properties[id.0].square]
    }

    pub fn property_name(&self, id: PropertyId) -> &str {
        &self.property_square(id).name
    }

    pub fn pool(&self) -> HouseHotelPool {
        self.pool
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn last_roll(&self) -> u32 {
        self.last_roll
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Resolve a decision against this game's random source.
    pub fn decide(&mut self, decision: &mut Decision) -> bool {
        decision.resolve(self.rng.as_mut())
    }

    /// Squares from the entity's position to the GO square, in `1..=len`.
    /// The full lap when standing on GO, or when the board has no GO square.
    pub fn distance_to_go(&self, id: EntityId) -> usize {
        let len = self.board.len();
        match self.go_index {
            Some(go) => {
                let distance = (go + len - self.entities[id.0].position) % len;
                if distance == 0 {
                    len
                } else {
                    distance
                }
            }
            None => len,
        }
    }

    // --- settlement ----------------------------------------------------

    /// Move money between two entities, settling immediately.
    ///
    /// Shortfalls trigger the payer's liquidation hook once, then settle as a
    /// partial payment followed by bankruptcy for players. Inside a forecast
    /// clone the attempt is recorded in the run partition and no balance
    /// moves. Returns whether the full amount was paid.
    pub fn transfer(&mut self, from: EntityId, to: EntityId, amount: Money, reason: &str) -> bool {
        let amount = amount.max(Money::ZERO);

        if self.run.is_simulation() {
            self.ledger.record(Transaction {
                from,
                to,
                requested: amount,
                paid: Money::ZERO,
                reason: reason.to_string(),
                run: self.run,
                completed: false,
                reversed: false,
            });
            return true;
        }

        if self.balance(from) < amount {
            let behavior = self.entities[from.0].behavior;
            behavior.policy().liquidate(self, from, amount);
        }

        let paid = amount.min(self.balance(from));
        self.entities[to.0].account.credit(paid);
        self.entities[from.0].account.debit(paid);
        self.ledger.record(Transaction {
            from,
            to,
            requested: amount,
            paid,
            reason: reason.to_string(),
            run: RunId::Real,
            completed: true,
            reversed: false,
        });

        if paid < amount {
            tracing::warn!(
                payer = %self.entities[from.0].name,
                payee = %self.entities[to.0].name,
                %amount,
                %paid,
                reason,
                "unable to pay in full"
            );
            if self.entities[from.0].kind == EntityKind::Player {
                self.bankrupt(from, to);
            }
            false
        } else {
            tracing::debug!(
                payer = %self.entities[from.0].name,
                payee = %self.entities[to.0].name,
                %amount,
                reason,
                balance = %self.balance(from),
                "paid"
            );
            true
        }
    }

    /// Undo a completed live transfer by index into the real-run ledger.
    pub fn reverse_transfer(&mut self, index: usize) -> Result<(), RuleViolation> {
        let record = self
            .ledger
            .real()
            .get(index)
            .cloned()
            .ok_or(RuleViolation::UnknownTransaction(index))?;
        if record.reversed {
            return Err(RuleViolation::AlreadyReversed(index));
        }
        if self.balance(record.to) < record.paid {
            return Err(RuleViolation::InsufficientFunds {
                needed: record.paid,
                available: self.balance(record.to),
            });
        }

        self.entities[record.to.0].account.debit(record.paid);
        self.entities[record.from.0].account.credit(record.paid);
        if let Some(partition) = self.ledger.run_mut(RunId::Real) {
            partition[index].reversed = true;
        }
        tracing::debug!(index, amount = %record.paid, "reversed transfer");
        Ok(())
    }

    /// Eliminate a player, handing their remaining portfolio to the creditor.
    /// A bank or pot creditor releases the properties back to the market with
    /// their development returned to the pool.
    pub(crate) fn bankrupt(&mut self, debtor: EntityId, creditor: EntityId) {
        let portfolio = std::mem::take(&mut self.entities[debtor.0].owned);
        let creditor_is_player =
            self.entities[creditor.0].kind == EntityKind::Player && self.entities[creditor.0].in_game;

        tracing::warn!(
            debtor = %self.entities[debtor.0].name,
            creditor = %self.entities[creditor.0].name,
            properties = portfolio.len(),
            "bankrupt"
        );

        for id in portfolio {
            let state = &mut self.properties[id.0];
            if creditor_is_player {
                state.owner = Some(creditor);
                self.entities[creditor.0].owned.push(id);
            } else {
                self.pool.houses += state.houses;
                self.pool.hotels += state.hotels;
                state.houses = 0;
                state.hotels = 0;
                state.owner = None;
                state.mortgaged = false;
            }
        }

        self.entities[debtor.0].in_game = false;
    }
}
