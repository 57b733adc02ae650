//! Deterministic event simulation over the stream bank.
//!
//! A session owns a seeded [`spira_rng::RngStreamBank`], a [`GameState`],
//! and an ordered event log. Script lines parse into commands, commands
//! construct events, and each event draws from its streams in a fixed
//! order while mutating the state. Two replays of the same script over the
//! same seed consume identical draws and walk identical state.

pub mod actor;
pub mod error;
pub mod event;
pub mod formulas;
pub mod parser;
pub mod state;
pub mod tracker;

pub use actor::{ActorId, ActorState};
pub use error::{TrackError, TrackResult};
pub use event::{Event, EventKind};
pub use formulas::EncounterCondition;
pub use parser::{parse, Command};
pub use state::{ActorRef, GameState, ItemStack, Snapshot};
pub use tracker::Tracker;
