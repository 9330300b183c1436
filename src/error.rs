use thiserror::Error;

use crate::domain::Money;

/// A refused property operation.
///
/// These are never fatal: the engine logs them and treats the operation as a
/// no-op. Settlement shortfalls are not errors at all; they resolve through
/// liquidation, partial payment and bankruptcy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("{0} is already mortgaged")]
    AlreadyMortgaged(String),
    #[error("{0} is not mortgaged")]
    NotMortgaged(String),
    #[error("{0} already has an owner")]
    AlreadyOwned(String),
    #[error("{0} has no owner")]
    NotOwned(String),
    #[error("{0} cannot be developed")]
    NotDevelopable(String),
    #[error("cannot develop {0} without holding its full set unmortgaged")]
    SetIncomplete(String),
    #[error("cannot place more than 4 houses on {0}")]
    HouseCapExceeded(String),
    #[error("{0} needs 4 houses before a hotel")]
    HotelRequiresFourHouses(String),
    #[error("{0} already has a hotel")]
    HotelAlreadyBuilt(String),
    #[error("no hotel on {0} to sell")]
    NoHotel(String),
    #[error("cannot sell {requested} houses on {name}: only {present} present")]
    NotEnoughHouses {
        name: String,
        requested: u8,
        present: u8,
    },
    #[error("the {kind} pool is exhausted ({available} left, {requested} requested)")]
    PoolExhausted {
        kind: &'static str,
        available: u8,
        requested: u8,
    },
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Money, available: Money },
    #[error("no transaction at index {0} in the live run")]
    UnknownTransaction(usize),
    #[error("transaction {0} was already reversed")]
    AlreadyReversed(usize),
}
