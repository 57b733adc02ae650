//! Bit-exact reproduction of the game's random number generator.
//!
//! The game keeps 68 independent 32-bit generator streams sharing one seed.
//! Every in-game roll consumes exactly one value from a specific stream, so
//! a tracker that knows the seed can predict every future roll, as long as
//! its arithmetic wraps exactly like the original binary's signed 32-bit
//! integers. All state here is `i32` with explicit wrapping operations;
//! nothing ever goes through a platform RNG.

pub mod bank;
pub mod constants;
pub mod error;
pub mod seed;
pub mod stream;

pub use bank::{RngStreamBank, STREAM_COUNT};
pub use error::{RngError, RngResult};
pub use seed::{Platform, SeedResolver, SeedTable};
pub use stream::RngStream;
