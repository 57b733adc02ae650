//! Error types for seed resolution.

use thiserror::Error;

/// Result type for generator operations.
pub type RngResult<T> = Result<T, RngError>;

/// Errors that can occur while resolving a seed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RngError {
    /// No seed reproduces the observed damage values.
    #[error("no seed found for the given damage values")]
    SeedNotFound,

    /// An observed damage value is outside the game-legal set for its slot,
    /// even after the crit-halving fallback.
    #[error("invalid damage value {value} at position {slot}")]
    InvalidDamageValue {
        /// Zero-based position of the offending value in the observed list.
        slot: usize,
        /// The value as given by the user.
        value: u32,
    },
}
