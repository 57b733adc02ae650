//! Immutable static game data.
//!
//! Everything in this crate is a lookup table the simulation reads and never
//! writes: the playable characters, monster prize structs, item and
//! autoability catalogs, action definitions, and the equipment model with
//! its name/value derivation. Tables ship as built-in presets and can be
//! extended from JSON before a session starts.

pub mod action;
pub mod autoability;
pub mod character;
pub mod equipment;
pub mod error;
pub mod item;
pub mod library;
pub mod monster;
pub mod stat;

pub use action::{Action, DamageKind, StatusApplication, TargetMode};
pub use autoability::AutoAbility;
pub use character::Character;
pub use equipment::{Equipment, EquipmentKind};
pub use error::{DataError, DataResult};
pub use item::Item;
pub use library::DataLibrary;
pub use monster::{BribeInfo, DropSlot, EquipmentDropTable, ItemDrop, Monster, StealTable};
pub use stat::{Affinity, Buff, Element, Stat, Status};
