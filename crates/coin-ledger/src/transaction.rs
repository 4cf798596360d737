use std::fmt;

use crate::identity::{AccountKey, Identity};

/// Subject prefix marking a commit as a ledger transaction.
pub const TAG: &str = "git-coin:";

/// What a transaction does to the source account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Moves coins from source to target (`Giving`).
    Transfer,
    /// Mints coins for the target; the source pays nothing (`Donating`).
    Donation,
}

impl Action {
    /// Keyword written in commit messages.
    pub fn keyword(self) -> &'static str {
        match self {
            Action::Transfer => "Giving",
            Action::Donation => "Donating",
        }
    }

    /// Parse a message keyword, ignoring ASCII case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        [Action::Transfer, Action::Donation]
            .into_iter()
            .find(|action| action.keyword().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One ledger event recognized from a history line.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    source: AccountKey,
    action: Action,
    amount: f64,
    target: AccountKey,
}

impl Transaction {
    pub fn new(source: AccountKey, action: Action, amount: f64, target: AccountKey) -> Self {
        Self {
            source,
            action,
            amount,
            target,
        }
    }

    pub fn transfer(source: &Identity, amount: f64, target: &Identity) -> Self {
        Self::new(source.key(), Action::Transfer, amount, target.key())
    }

    pub fn donation(source: &Identity, amount: f64, target: &Identity) -> Self {
        Self::new(source.key(), Action::Donation, amount, target.key())
    }

    pub fn source(&self) -> &AccountKey {
        &self.source
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn target(&self) -> &AccountKey {
        &self.target
    }
}

/// Commit message that records `action` on replay.
///
/// The author prefix (`Name <email> - `) is added by git's log formatting,
/// so only the subject is produced here. `amount` must be finite and
/// non-negative for the message to be recognized again.
pub fn commit_message(action: Action, amount: f64, target: &Identity) -> String {
    format!("{TAG} {} {amount} coins to {target}", action.keyword())
}
