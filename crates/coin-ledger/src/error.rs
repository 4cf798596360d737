use thiserror::Error;

/// Errors raised while reading history from the backing repository.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("history backend error: {0}")]
    Backend(String),
}

/// Errors produced while replaying the ledger.
///
/// Any of these aborts the whole query; there is no partial ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("malformed amount {amount:?} in transaction {line:?}")]
    MalformedAmount { amount: String, line: String },

    #[error("history error: {0}")]
    History(#[from] HistoryError),
}

/// Convenience type alias for ledger queries.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors produced by write operations on the ledger.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("please stash or commit unstaged changes before exchanging git-coins; dirty transactions are unsanitary")]
    DirtyWorkingTree,

    #[error("you don't have enough coins: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: f64, requested: f64 },

    #[error("invalid amount {0}: coins must be a finite, non-negative number")]
    InvalidAmount(f64),

    #[error("I don't know how much money you have; I don't even know who you are! set {missing} with `git config`")]
    UnknownCurrentUser { missing: String },

    #[error("you can't take coins from somebody else")]
    TakeRefused,

    #[error("seriously, you can't take coins from somebody else. stop trying")]
    ForcedTakeRefused,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    History(#[from] HistoryError),
}
