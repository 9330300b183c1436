use std::collections::HashMap;

use thiserror::Error;

use crate::behavior::{BehaviorKind, Personality};
use crate::domain::Money;

/// Game rules and table stakes. Defaults match the documented house rules:
/// free-parking pot, three-turn jail limit, 48 houses, 12 hotels.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub bank_balance: Money,
    pub free_parking_balance: Money,
    pub starting_balance: Money,
    pub go_amount: Money,
    pub jail_fine: Money,
    pub max_turns_in_jail: u32,
    pub num_dice: u32,
    pub die_size: u32,
    pub num_houses: u8,
    pub num_hotels: u8,
    pub players: Players,
}

/// Who sits at the table: a count of default AI players, or an explicit
/// roster.
#[derive(Debug, Clone)]
pub enum Players {
    Count(u32),
    Roster(Vec<PlayerSpec>),
}

impl Players {
    pub fn len(&self) -> usize {
        match self {
            Players::Count(n) => *n as usize,
            Players::Roster(specs) => specs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One seat at the table.
#[derive(Debug, Clone)]
pub struct PlayerSpec {
    pub name: String,
    pub behavior: BehaviorKind,
    /// Drawn at random when absent.
    pub personality: Option<Personality>,
    pub jail_free_cards: u32,
}

impl PlayerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        PlayerSpec {
            name: name.into(),
            behavior: BehaviorKind::Heuristic,
            personality: None,
            jail_free_cards: 0,
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorKind) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            bank_balance: Money(12755),
            free_parking_balance: Money::ZERO,
            starting_balance: Money(1500),
            go_amount: Money(200),
            jail_fine: Money(50),
            max_turns_in_jail: 3,
            num_dice: 2,
            die_size: 6,
            num_houses: 48,
            num_hotels: 12,
            players: Players::Count(4),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
    #[error("A game needs at least two players, got {0}")]
    TooFewPlayers(usize),
    #[error("The board has no squares")]
    EmptyBoard,
    #[error("The board is missing a required square: {0}")]
    MissingSquare(String),
    #[error("The {0} deck has no cards but the board draws from it")]
    EmptyDeck(&'static str),
    #[error("A card names an unknown square: {0}")]
    UnknownCardTarget(String),
    #[error("Dice configuration must be at least one die with two faces")]
    InvalidDice,
}

impl GameConfig {
    /// Validate the table-stakes part of the configuration. Board-dependent
    /// checks run in `Game::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.len() < 2 {
            return Err(ConfigError::TooFewPlayers(self.players.len()));
        }
        if self.num_dice == 0 || self.die_size < 2 {
            return Err(ConfigError::InvalidDice);
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    /// Build a config from an environment map, starting from the defaults.
    /// Only the knobs a host typically tunes are exposed.
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = GameConfig::default();

        if let Some(raw) = env_map.get("PLAYERS") {
            let count = raw.parse::<u32>().map_err(|_| {
                ConfigError::InvalidValue("PLAYERS".to_string(), "must be a valid u32".to_string())
            })?;
            config.players = Players::Count(count);
        }

        if let Some(raw) = env_map.get("STARTING_BALANCE") {
            let units = raw.parse::<i64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "STARTING_BALANCE".to_string(),
                    "must be a valid i64".to_string(),
                )
            })?;
            config.starting_balance = Money(units);
        }

        if let Some(raw) = env_map.get("BANK_BALANCE") {
            let units = raw.parse::<i64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "BANK_BALANCE".to_string(),
                    "must be a valid i64".to_string(),
                )
            })?;
            config.bank_balance = Money(units);
        }

        if let Some(raw) = env_map.get("MAX_TURNS_IN_JAIL") {
            config.max_turns_in_jail = raw.parse::<u32>().map_err(|_| {
                ConfigError::InvalidValue(
                    "MAX_TURNS_IN_JAIL".to_string(),
                    "must be a valid u32".to_string(),
                )
            })?;
        }

        config.validate()?;
        Ok(config)
    }
}
