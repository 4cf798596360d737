//! History backend that drives the `git` binary.
//!
//! [`GitRepository`] implements the ledger's
//! [`HistoryReader`](coin_ledger::HistoryReader) and
//! [`CommitWriter`](coin_ledger::CommitWriter) traits. Log output is streamed
//! through a pipe with [`LogStream`] rather than buffered in full.

pub mod repository;
pub mod stream;

pub use repository::GitRepository;
pub use stream::LogStream;
