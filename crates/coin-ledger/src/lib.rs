//! Ledger core for git-coin.
//!
//! git-coin treats specially formatted commit messages as an append-only
//! transaction log. Nothing is stored: every balance is recomputed by replaying
//! the matching commits each time it is needed.
//!
//! This crate provides:
//! - Identity normalization ([`normalize`], [`Identity`], [`AccountKey`])
//! - The transaction line matcher ([`match_line`], [`transactions`])
//! - Deterministic replay into per-account balances ([`ReplayEngine`])
//! - The user registry built from authorship history ([`UserRegistry`])
//! - `HistoryReader` / `CommitWriter` collaborator boundaries
//! - The query layer ([`CoinLedger`]) and write operations ([`Exchange`])
//! - `InMemoryHistory` for tests and embedding

pub mod error;
pub mod exchange;
pub mod identity;
pub mod matcher;
pub mod memory;
pub mod query;
pub mod registry;
pub mod replay;
pub mod traits;
pub mod transaction;

pub use error::{ExchangeError, HistoryError, LedgerError, Result};
pub use exchange::Exchange;
pub use identity::{normalize, AccountKey, Identity};
pub use matcher::{match_line, transactions, Transactions};
pub use memory::{CommitEntry, InMemoryHistory};
pub use query::{AccountBalance, CoinLedger};
pub use registry::UserRegistry;
pub use replay::{LedgerState, ReplayEngine};
pub use traits::{CommitWriter, HistoryReader, Lines};
pub use transaction::{commit_message, Action, Transaction, TAG};
