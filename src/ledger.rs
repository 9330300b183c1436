//! Accounts and the append-only transaction ledger.
//!
//! An [`Account`] is a pure balance cell: `credit` and `debit` are arithmetic
//! primitives with no error path. The settlement layer in the engine is
//! responsible for never debiting past zero (it liquidates first). Every
//! settlement attempt, real or simulated, lands in the [`Ledger`], which
//! keeps one append-only partition per [`RunId`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{EntityId, Money, RunId};

/// A balance owned by one entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    balance: Money,
}

impl Account {
    pub fn new(balance: Money) -> Self {
        Account { balance }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn credit(&mut self, amount: Money) {
        debug_assert!(!amount.is_negative());
        self.balance += amount;
    }

    /// Callers guarantee `amount <= balance`; the settlement layer liquidates
    /// before debiting.
    pub fn debit(&mut self, amount: Money) {
        debug_assert!(!amount.is_negative());
        debug_assert!(amount <= self.balance);
        self.balance -= amount;
    }
}

/// One recorded transfer attempt between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: EntityId,
    pub to: EntityId,
    /// The amount the receiver was owed.
    pub requested: Money,
    /// The amount actually moved. Less than `requested` on a partial payment,
    /// always zero for simulation runs.
    pub paid: Money,
    pub reason: String,
    pub run: RunId,
    /// Whether settlement was attempted against real balances.
    pub completed: bool,
    pub reversed: bool,
}

impl Transaction {
    pub fn is_partial(&self) -> bool {
        self.paid < self.requested
    }

    pub fn is_simulation(&self) -> bool {
        self.run.is_simulation()
    }
}

/// Append-only audit trail, partitioned by run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    runs: BTreeMap<RunId, Vec<Transaction>>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Append a record to its run partition, returning its index there.
    pub fn record(&mut self, transaction: Transaction) -> usize {
        let partition = self.runs.entry(transaction.run).or_default();
        partition.push(transaction);
        partition.len() - 1
    }

    /// Records for one run, in append order.
    pub fn run(&self, run: RunId) -> &[Transaction] {
        self.runs.get(&run).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The live game's records.
    pub fn real(&self) -> &[Transaction] {
        self.run(RunId::Real)
    }

    /// All records across all runs, real first then forecast runs in order.
    pub fn iter_all(&self) -> impl Iterator<Item = &Transaction> {
        self.runs.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.runs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Real-run records in which the entity paid.
    pub fn debits_of(&self, entity: EntityId) -> impl Iterator<Item = &Transaction> {
        self.real().iter().filter(move |t| t.from == entity)
    }

    /// Real-run records in which the entity was paid.
    pub fn credits_of(&self, entity: EntityId) -> impl Iterator<Item = &Transaction> {
        self.real().iter().filter(move |t| t.to == entity)
    }

    pub(crate) fn run_mut(&mut self, run: RunId) -> Option<&mut Vec<Transaction>> {
        self.runs.get_mut(&run)
    }

    /// Remove and return a run's partition (used to fold a forecast clone's
    /// records back into the live audit trail).
    pub fn take_run(&mut self, run: RunId) -> Vec<Transaction> {
        self.runs.remove(&run).unwrap_or_default()
    }
}
