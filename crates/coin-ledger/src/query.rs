use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::identity::{normalize, Identity};
use crate::registry::UserRegistry;
use crate::replay::{LedgerState, ReplayEngine};
use crate::traits::HistoryReader;

/// An identity paired with its current balance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccountBalance {
    pub identity: Identity,
    pub coins: f64,
}

/// Read-only ledger queries over a history backend.
///
/// Every call replays the full history; nothing is cached between calls.
pub struct CoinLedger<H> {
    history: H,
}

impl<H: HistoryReader> CoinLedger<H> {
    pub fn new(history: H) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Replay every transaction in history.
    pub fn replay(&self) -> Result<LedgerState> {
        ReplayEngine::replay_lines(self.history.transaction_lines()?)
    }

    /// All authors in history.
    pub fn registry(&self) -> Result<UserRegistry> {
        Ok(UserRegistry::from_lines(self.history.authors()?)?)
    }

    /// Balance of `identity`; accounts that never transacted hold 0.
    pub fn balance_of(&self, identity: &str) -> Result<f64> {
        let key = normalize(identity);
        let balance = self.replay()?.balance(&key);
        debug!(account = %key, balance, "balance queried");
        Ok(balance)
    }

    /// Every author who took part in a transaction, in registry order.
    pub fn list_all(&self) -> Result<Vec<AccountBalance>> {
        let registry = self.registry()?;
        let ledger = self.replay()?;

        Ok(registry
            .iter()
            .filter_map(|identity| {
                ledger.get(&identity.key()).map(|coins| AccountBalance {
                    identity: identity.clone(),
                    coins,
                })
            })
            .collect())
    }
}
