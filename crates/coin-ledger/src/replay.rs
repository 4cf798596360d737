use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{HistoryError, Result};
use crate::identity::AccountKey;
use crate::matcher::transactions;
use crate::transaction::{Action, Transaction};

/// Per-account balances folded from a transaction sequence.
///
/// Built fresh for every query and never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerState {
    balances: BTreeMap<AccountKey, f64>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one transaction into the balances.
    ///
    /// Both parties get an entry, even a donor whose balance does not move.
    pub fn apply(&mut self, tx: &Transaction) {
        self.balances.entry(tx.source().clone()).or_insert(0.0);
        self.balances.entry(tx.target().clone()).or_insert(0.0);

        if tx.action() == Action::Transfer {
            if let Some(balance) = self.balances.get_mut(tx.source()) {
                *balance -= tx.amount();
            }
        }
        if let Some(balance) = self.balances.get_mut(tx.target()) {
            *balance += tx.amount();
        }
    }

    /// Balance of `key`, or 0 for accounts that never transacted.
    pub fn balance(&self, key: &AccountKey) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    pub fn get(&self, key: &AccountKey) -> Option<f64> {
        self.balances.get(key).copied()
    }

    pub fn contains(&self, key: &AccountKey) -> bool {
        self.balances.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountKey, f64)> {
        self.balances.iter().map(|(key, balance)| (key, *balance))
    }
}

/// Deterministic replay of transaction history into balances.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Fold already-parsed transactions. Replay itself cannot fail.
    pub fn replay<I>(records: I) -> LedgerState
    where
        I: IntoIterator<Item = Transaction>,
    {
        let mut state = LedgerState::new();
        for tx in records {
            state.apply(&tx);
        }
        state
    }

    /// Match and fold raw history lines in a single forward pass.
    ///
    /// The first read error or malformed amount aborts the replay.
    pub fn replay_lines<I>(lines: I) -> Result<LedgerState>
    where
        I: IntoIterator<Item = std::result::Result<String, HistoryError>>,
    {
        let mut state = LedgerState::new();
        let mut applied = 0u64;

        for tx in transactions(lines) {
            state.apply(&tx?);
            applied += 1;
        }

        debug!(applied, accounts = state.len(), "ledger replayed");
        Ok(state)
    }
}
