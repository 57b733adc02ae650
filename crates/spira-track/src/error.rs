//! Session and event errors.

use thiserror::Error;

/// Errors raised while building events or parsing commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// A command line could not be turned into an event.
    #[error("could not parse event: {0}")]
    EventParsing(String),

    /// A data-table lookup failed.
    #[error(transparent)]
    Data(#[from] spira_data::DataError),

    /// The named character is not in the active party.
    #[error("{0} is not in the active party")]
    NotInParty(String),

    /// No monster with the given battle index is on the field.
    #[error("no monster in battle slot {0}")]
    NoSuchMonster(usize),
}

/// Result alias for session operations.
pub type TrackResult<T> = Result<T, TrackError>;
