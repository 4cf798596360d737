//! Collaborator boundaries between the ledger core and a repository backend.
//!
//! The core never talks to git directly. A backend (the `git` CLI, or
//! [`InMemoryHistory`](crate::memory::InMemoryHistory) in tests) implements
//! these traits and is passed in explicitly.

use crate::error::HistoryError;
use crate::identity::Identity;

/// A lazily read feed of history lines.
pub type Lines<'a> = Box<dyn Iterator<Item = Result<String, HistoryError>> + 'a>;

/// Read boundary: the commit history the ledger is derived from.
pub trait HistoryReader {
    /// Author of every commit as `Name <email>`, most recent first.
    fn authors(&self) -> Result<Lines<'_>, HistoryError>;

    /// `<author> - <subject>` for every commit whose message has a line
    /// starting with [`TAG`](crate::transaction::TAG), most recent first.
    fn transaction_lines(&self) -> Result<Lines<'_>, HistoryError>;

    /// Most recent author whose identity contains `query`, ignoring case.
    fn find_author(&self, query: &str) -> Result<Option<Identity>, HistoryError>;
}

/// Write boundary: records new transactions as commits.
pub trait CommitWriter {
    /// Whether the working tree has no uncommitted changes.
    fn is_clean(&self) -> Result<bool, HistoryError>;

    /// Record an empty commit carrying `message`.
    fn commit(&self, message: &str) -> Result<(), HistoryError>;

    /// Configured author name, `None` when unset or blank.
    fn user_name(&self) -> Result<Option<String>, HistoryError>;

    /// Configured author email, `None` when unset or blank.
    fn user_email(&self) -> Result<Option<String>, HistoryError>;
}

impl<T: HistoryReader + ?Sized> HistoryReader for &T {
    fn authors(&self) -> Result<Lines<'_>, HistoryError> {
        (**self).authors()
    }

    fn transaction_lines(&self) -> Result<Lines<'_>, HistoryError> {
        (**self).transaction_lines()
    }

    fn find_author(&self, query: &str) -> Result<Option<Identity>, HistoryError> {
        (**self).find_author(query)
    }
}

impl<T: CommitWriter + ?Sized> CommitWriter for &T {
    fn is_clean(&self) -> Result<bool, HistoryError> {
        (**self).is_clean()
    }

    fn commit(&self, message: &str) -> Result<(), HistoryError> {
        (**self).commit(message)
    }

    fn user_name(&self) -> Result<Option<String>, HistoryError> {
        (**self).user_name()
    }

    fn user_email(&self) -> Result<Option<String>, HistoryError> {
        (**self).user_email()
    }
}
