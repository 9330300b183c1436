//! Index-based references between the game's arena tables.
//!
//! Entities, properties and transactions refer to each other through these
//! small copyable ids rather than pointers, so cloning a game for a forecast
//! run is a plain table copy with no aliasing.

use serde::{Deserialize, Serialize};

/// Index into the game's entity table (bank, free-parking pot, players).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub usize);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Index into the game's property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub usize);

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "property#{}", self.0)
    }
}

/// Partition tag for ledger records: the live game, or one forecast run.
///
/// Forecast runs get their own partition so simulated payments never mix with
/// the real audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunId {
    Real,
    Forecast(u32),
}

impl RunId {
    pub fn is_simulation(&self) -> bool {
        matches!(self, RunId::Forecast(_))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunId::Real => write!(f, "real"),
            RunId::Forecast(n) => write!(f, "forecast#{}", n),
        }
    }
}

/// Development-eligibility tag grouping streets into colour sets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColourSet(pub String);

impl ColourSet {
    pub fn new(name: impl Into<String>) -> Self {
        ColourSet(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ColourSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_simulation_flag() {
        assert!(!RunId::Real.is_simulation());
        assert!(RunId::Forecast(3).is_simulation());
    }

    #[test]
    fn test_run_id_ordering_keeps_real_first() {
        assert!(RunId::Real < RunId::Forecast(0));
        assert!(RunId::Forecast(1) < RunId::Forecast(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId(2).to_string(), "entity#2");
        assert_eq!(RunId::Forecast(7).to_string(), "forecast#7");
    }
}
