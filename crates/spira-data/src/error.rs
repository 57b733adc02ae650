//! Data lookup errors.

use thiserror::Error;

/// Errors produced by data-table lookups and loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// No monster with the given name.
    #[error("unknown monster: {0}")]
    UnknownMonster(String),

    /// No action with the given name.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A data file failed to parse.
    #[error("malformed data file: {0}")]
    Malformed(String),
}

/// Result alias for data lookups.
pub type DataResult<T> = Result<T, DataError>;
