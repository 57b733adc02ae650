//! Subcommand implementations.

pub mod replay;
pub mod resolve;
pub mod roll;
pub mod seed;
