//! In-memory history for tests and embedding.
//!
//! [`InMemoryHistory`] keeps commits in a `Vec` behind a `RwLock` and
//! implements both [`HistoryReader`] and [`CommitWriter`], following git's
//! log semantics closely enough for the ledger to be exercised without a
//! repository on disk.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::HistoryError;
use crate::identity::Identity;
use crate::traits::{CommitWriter, HistoryReader, Lines};
use crate::transaction::TAG;

/// One recorded commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitEntry {
    pub author: Identity,
    pub message: String,
}

impl CommitEntry {
    /// First line of the message, as git's `%s` prints it.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

#[derive(Debug, Default)]
struct State {
    /// Oldest first.
    commits: Vec<CommitEntry>,
    user_name: Option<String>,
    user_email: Option<String>,
    dirty: bool,
}

/// An in-memory repository history.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    state: RwLock<State>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history whose new commits are authored by `name <email>`.
    pub fn with_user(name: &str, email: &str) -> Self {
        let history = Self::new();
        history.set_user(Some(name), Some(email));
        history
    }

    /// Append a commit by an arbitrary author.
    pub fn record(&self, author: &str, message: &str) -> Result<(), HistoryError> {
        self.write()?.commits.push(CommitEntry {
            author: Identity::new(author),
            message: message.to_string(),
        });
        Ok(())
    }

    pub fn set_user(&self, name: Option<&str>, email: Option<&str>) {
        if let Ok(mut state) = self.state.write() {
            state.user_name = name.map(str::to_string);
            state.user_email = email.map(str::to_string);
        }
    }

    /// Mark the working tree as having uncommitted changes.
    pub fn set_dirty(&self, dirty: bool) {
        if let Ok(mut state) = self.state.write() {
            state.dirty = dirty;
        }
    }

    /// All commits, oldest first.
    pub fn commits(&self) -> Result<Vec<CommitEntry>, HistoryError> {
        Ok(self.read()?.commits.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, HistoryError> {
        self.state
            .read()
            .map_err(|e| HistoryError::Backend(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, HistoryError> {
        self.state
            .write()
            .map_err(|e| HistoryError::Backend(format!("lock poisoned: {e}")))
    }

    fn newest_first<F>(&self, select: F) -> Result<Lines<'_>, HistoryError>
    where
        F: Fn(&CommitEntry) -> Option<String>,
    {
        let lines: Vec<_> = self
            .read()?
            .commits
            .iter()
            .rev()
            .filter_map(select)
            .map(Ok)
            .collect();
        Ok(Box::new(lines.into_iter()))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl HistoryReader for InMemoryHistory {
    fn authors(&self) -> Result<Lines<'_>, HistoryError> {
        self.newest_first(|commit| Some(commit.author.to_string()))
    }

    fn transaction_lines(&self) -> Result<Lines<'_>, HistoryError> {
        self.newest_first(|commit| {
            commit
                .message
                .lines()
                .any(|line| line.starts_with(TAG))
                .then(|| format!("{} - {}", commit.author, commit.subject()))
        })
    }

    fn find_author(&self, query: &str) -> Result<Option<Identity>, HistoryError> {
        let query = query.to_lowercase();
        Ok(self
            .read()?
            .commits
            .iter()
            .rev()
            .find(|commit| commit.author.as_str().to_lowercase().contains(&query))
            .map(|commit| commit.author.clone()))
    }
}

impl CommitWriter for InMemoryHistory {
    fn is_clean(&self) -> Result<bool, HistoryError> {
        Ok(!self.read()?.dirty)
    }

    fn commit(&self, message: &str) -> Result<(), HistoryError> {
        let mut state = self.write()?;
        let (Some(name), Some(email)) = (non_blank(&state.user_name), non_blank(&state.user_email))
        else {
            return Err(HistoryError::Backend(
                "author identity unknown; set user name and email".into(),
            ));
        };
        state.commits.push(CommitEntry {
            author: Identity::from_parts(&name, &email),
            message: message.to_string(),
        });
        Ok(())
    }

    fn user_name(&self) -> Result<Option<String>, HistoryError> {
        Ok(non_blank(&self.read()?.user_name))
    }

    fn user_email(&self) -> Result<Option<String>, HistoryError> {
        Ok(non_blank(&self.read()?.user_email))
    }
}
