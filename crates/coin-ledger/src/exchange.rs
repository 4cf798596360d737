//! Write operations: recording new transactions as commits.
//!
//! [`Exchange`] pairs the query layer with a [`CommitWriter`]. Every write
//! requires a clean working tree so a transaction commit never carries
//! unrelated changes.

use tracing::{debug, warn};

use crate::error::ExchangeError;
use crate::identity::Identity;
use crate::query::{AccountBalance, CoinLedger};
use crate::traits::{CommitWriter, HistoryReader};
use crate::transaction::{commit_message, Action};

type Result<T> = std::result::Result<T, ExchangeError>;

/// Ledger queries plus the operations that append to history.
pub struct Exchange<H, W> {
    ledger: CoinLedger<H>,
    writer: W,
}

impl<H: HistoryReader, W: CommitWriter> Exchange<H, W> {
    pub fn new(history: H, writer: W) -> Self {
        Self {
            ledger: CoinLedger::new(history),
            writer,
        }
    }

    pub fn ledger(&self) -> &CoinLedger<H> {
        &self.ledger
    }

    /// The configured committer as `Name <email>`.
    pub fn current_user(&self) -> Result<Identity> {
        let name = self.writer.user_name()?;
        let email = self.writer.user_email()?;
        match (name, email) {
            (Some(name), Some(email)) => Ok(Identity::from_parts(&name, &email)),
            (name, email) => {
                let missing: Vec<&str> = [
                    name.is_none().then_some("user.name"),
                    email.is_none().then_some("user.email"),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(ExchangeError::UnknownCurrentUser {
                    missing: missing.join(" and "),
                })
            }
        }
    }

    /// The current user and their balance.
    pub fn info(&self) -> Result<AccountBalance> {
        let identity = self.current_user()?;
        let coins = self.ledger.balance_of(identity.as_str())?;
        Ok(AccountBalance { identity, coins })
    }

    /// Resolve a partial name or email to the most recent matching author.
    ///
    /// Unknown users are used exactly as given.
    pub fn resolve_user(&self, query: &str) -> Result<Identity> {
        match self.ledger.history().find_author(query)? {
            Some(identity) => Ok(identity),
            None => {
                warn!("user {query} not found; using {query} as-is");
                Ok(Identity::new(query))
            }
        }
    }

    /// Transfer `amount` from the current user to `user`.
    ///
    /// Fails when the current balance does not cover `amount`, unless
    /// `force` is set. Returns the recorded commit message.
    pub fn give(&self, user: &str, amount: f64, force: bool) -> Result<String> {
        let amount = check_amount(amount)?;
        self.require_clean()?;
        let target = self.resolve_user(user)?;

        if !force {
            let balance = self.ledger.balance_of(self.current_user()?.as_str())?;
            if amount > balance {
                return Err(ExchangeError::InsufficientFunds {
                    balance,
                    requested: amount,
                });
            }
        }

        self.record(Action::Transfer, amount, &target)
    }

    /// Taking coins from someone else is never allowed.
    pub fn take(&self, force: bool) -> Result<()> {
        self.require_clean()?;
        if force {
            Err(ExchangeError::ForcedTakeRefused)
        } else {
            Err(ExchangeError::TakeRefused)
        }
    }

    /// Mint `amount` coins for `user` at no cost to anyone.
    pub fn donate(&self, user: &str, amount: f64) -> Result<String> {
        let amount = check_amount(amount)?;
        self.require_clean()?;
        let target = self.resolve_user(user)?;
        self.record(Action::Donation, amount, &target)
    }

    /// Donate `amount` coins to every author in history.
    pub fn seed(&self, amount: f64) -> Result<Vec<String>> {
        let amount = check_amount(amount)?;
        self.require_clean()?;
        let registry = self.ledger.registry()?;

        registry
            .iter()
            .map(|user| self.record(Action::Donation, amount, user))
            .collect()
    }

    fn require_clean(&self) -> Result<()> {
        if self.writer.is_clean()? {
            Ok(())
        } else {
            Err(ExchangeError::DirtyWorkingTree)
        }
    }

    fn record(&self, action: Action, amount: f64, target: &Identity) -> Result<String> {
        let message = commit_message(action, amount, target);
        self.writer.commit(&message)?;
        debug!(%message, "transaction committed");
        Ok(message)
    }
}

/// Validate an amount for writing. Negative zero comes back as `0` so the
/// recorded message stays inside the amount grammar.
fn check_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount + 0.0)
    } else {
        Err(ExchangeError::InvalidAmount(amount))
    }
}
