//! Read-only game views for presentation layers.

use serde::Serialize;

use crate::domain::Money;
use crate::engine::Game;

/// A serialisable snapshot of the observable game state.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub turn: u32,
    pub completed: bool,
    pub bank_balance: Money,
    pub free_parking_balance: Money,
    pub pool_houses: u8,
    pub pool_hotels: u8,
    pub players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub balance: Money,
    pub position: usize,
    pub square: String,
    pub in_game: bool,
    pub in_jail: bool,
    pub jail_free_cards: u32,
    pub properties: Vec<String>,
}

impl Game {
    /// A point-in-time view of the game for a presentation layer.
    pub fn snapshot(&self) -> GameSnapshot {
        let players = self
            .players()
            .iter()
            .map(|id| {
                let entity = self.entity(*id);
                PlayerSnapshot {
                    name: entity.name.clone(),
                    balance: entity.balance(),
                    position: entity.position,
                    square: self.square(entity.position).name.clone(),
                    in_game: entity.in_game,
                    in_jail: entity.in_jail,
                    jail_free_cards: entity.jail_free_cards,
                    properties: entity
                        .owned
                        .iter()
                        .map(|p| self.property_name(*p).to_string())
                        .collect(),
                }
            })
            .collect();

        GameSnapshot {
            turn: self.turn(),
            completed: self.is_completed(),
            bank_balance: self.balance(self.bank()),
            free_parking_balance: self.balance(self.free_parking_pot()),
            pool_houses: self.pool().houses,
            pool_hotels: self.pool().hotels,
            players,
        }
    }
}
