//! Forward-looking risk estimation for AI decisions.
//!
//! `forecast` replays each reachable square against a disposable clone of the
//! whole game, with every behavior swapped to the simulation-safe policy and
//! all payments recorded (never applied) in a dedicated run partition. The
//! caller gets a sorted distribution of signed outcomes; the live game keeps
//! only the audit records.

use crate::behavior::BehaviorKind;
use crate::domain::{EntityId, Money, RunId};
use crate::ledger::Ledger;
use crate::rng::StdRandomizer;

use super::Game;

/// The monetary outcomes a player is exposed to over the next move, sorted
/// from worst (most negative) to best.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    outcomes: Vec<Money>,
}

impl Exposure {
    /// Signed outcomes in ascending order: debits negative, credits positive.
    pub fn outcomes(&self) -> &[Money] {
        &self.outcomes
    }

    /// The most negative outcome, or zero when nothing is reachable.
    pub fn worst(&self) -> Money {
        self.outcomes.first().copied().unwrap_or(Money::ZERO)
    }

    pub fn best(&self) -> Money {
        self.outcomes.last().copied().unwrap_or(Money::ZERO)
    }

    /// The mean outcome across all reachable squares.
    pub fn expected(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let total: i64 = self.outcomes.iter().map(|m| m.as_i64()).sum();
        total as f64 / self.outcomes.len() as f64
    }

    /// The worst outcome expressed as a non-negative cost.
    pub fn worst_cost(&self) -> Money {
        (-self.worst()).max(Money::ZERO)
    }
}

impl Game {
    /// Estimate the player's monetary exposure over every square reachable
    /// with the next roll (1 up to the maximum the dice allow).
    ///
    /// Each step runs against its own clone, so a jail teleport or movement
    /// card in one scenario cannot contaminate another. The simulated
    /// payment records are folded back into the live audit trail under their
    /// forecast run id.
    pub fn forecast(&mut self, player: EntityId) -> Exposure {
        let steps = self.num_dice * self.die_size;
        let len = self.board.len();
        let position = self.entities[player.0].position;
        let mut outcomes = Vec::with_capacity(steps as usize);

        for step in 1..=steps {
            let run = RunId::Forecast(self.next_forecast_run);
            self.next_forecast_run += 1;

            let mut sim = self.clone_for_forecast(run);
            sim.last_roll = step;
            let target = (position + step as usize) % len;
            sim.resolve_square(player, target);

            let records = sim.ledger.take_run(run);
            let mut net = Money::ZERO;
            for record in &records {
                if record.to == player {
                    net += record.requested;
                }
                if record.from == player {
                    net -= record.requested;
                }
            }
            for record in records {
                self.ledger.record(record);
            }
            outcomes.push(net);
        }

        outcomes.sort();
        let exposure = Exposure { outcomes };
        tracing::debug!(
            player = %self.entities[player.0].name,
            worst = %exposure.worst(),
            best = %exposure.best(),
            "forecast"
        );
        exposure
    }

    /// A fully isolated copy of the game for one forecast run: every table is
    /// copied, every behavior is the simulation-safe no-op policy, and the
    /// ledger starts empty in the run's own partition.
    fn clone_for_forecast(&self, run: RunId) -> Game {
        let mut entities = self.entities.clone();
        for entity in &mut entities {
            entity.behavior = BehaviorKind::Simulation;
        }
        let seed = match run {
            RunId::Forecast(n) => ((self.turn as u64) << 32) | n as u64,
            RunId::Real => self.turn as u64,
        };

        Game {
            board: self.board.clone(),
            square_property: self.square_property.clone(),
            properties: self.properties.clone(),
            entities,
            bank: self.bank,
            pot: self.pot,
            player_ids: self.player_ids.clone(),
            pool: self.pool,
            chance: self.chance.clone(),
            community_chest: self.community_chest.clone(),
            ledger: Ledger::new(),
            turn: self.turn,
            last_roll: self.last_roll,
            completed: self.completed,
            go_index: self.go_index,
            jail_index: self.jail_index,
            go_amount: self.go_amount,
            jail_fine: self.jail_fine,
            max_turns_in_jail: self.max_turns_in_jail,
            num_dice: self.num_dice,
            die_size: self.die_size,
            run,
            next_forecast_run: 0,
            rng: Box::new(StdRandomizer::seeded(seed)),
        }
    }
}
