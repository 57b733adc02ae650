//! Monster prize structs.
//!
//! One record per monster, mirroring the fixed-layout prize struct the game
//! ships: stats, steal and drop tables, bribe data, and the parameters the
//! equipment generator needs. The simulation reads these and never writes
//! them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::autoability::AutoAbility;
use crate::character::Character;
use crate::equipment::EquipmentKind;
use crate::item::Item;
use crate::stat::{Affinity, Element, Stat, Status};

/// An item with a quantity, as listed in a prize table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    /// The item.
    pub item: Item,
    /// How many of it.
    pub quantity: u32,
}

/// The monster's steal table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealTable {
    /// Base steal chance out of 255, halved per prior successful steal.
    pub base_chance: u32,
    /// Item on a common steal.
    pub common: ItemDrop,
    /// Item on a rare steal.
    pub rare: ItemDrop,
}

/// One of the monster's two item drop slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSlot {
    /// Drop chance out of 255.
    pub chance: u32,
    /// Item on a common drop.
    pub common: ItemDrop,
    /// Item on a rare drop.
    pub rare: ItemDrop,
}

/// Bribe outcome for the monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BribeInfo {
    /// Gil the bribe costs.
    pub cost: u32,
    /// Item handed over when the bribe lands.
    pub item: Item,
    /// Quantity handed over.
    pub quantity: u32,
}

/// Parameters the equipment generator reads when this monster drops gear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentDropTable {
    /// Equipment drop chance out of 255.
    pub chance: u32,
    /// Added to the slot-count roll before shaping.
    pub slots_modifier: u32,
    /// Added to the ability-roll-count roll before shaping.
    pub ability_rolls_modifier: u32,
    /// Weapon damage constant stamped on generated weapons.
    pub base_weapon_damage: u32,
    /// Crit bonus stamped on generated gear.
    pub bonus_crit: u32,
    /// Per-owner 8-slot weapon ability pools; index 0 is the forced slot.
    pub weapon_pools: BTreeMap<Character, Vec<Option<AutoAbility>>>,
    /// Per-owner 8-slot armor ability pools; index 0 is the forced slot.
    pub armor_pools: BTreeMap<Character, Vec<Option<AutoAbility>>>,
}

impl EquipmentDropTable {
    /// The 8-slot ability pool for an owner and equipment kind.
    pub fn pool(&self, kind: EquipmentKind, owner: Character) -> &[Option<AutoAbility>] {
        let pools = match kind {
            EquipmentKind::Weapon => &self.weapon_pools,
            EquipmentKind::Armor => &self.armor_pools,
        };
        pools.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A monster's full prize struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    /// Lookup name (lowercase, underscores).
    pub name: String,
    /// Combat stats.
    pub stats: BTreeMap<Stat, u32>,
    /// Gil awarded on a kill.
    pub gil: u32,
    /// Whether the monster counts as armored (damage cut unless pierced).
    pub armored: bool,
    /// Poison tick, percent of max HP.
    pub poison_rate: u32,
    /// Resistance tier against Zanmato.
    pub zanmato_level: u32,
    /// Damage in one blow at or above which the kill is an overkill.
    pub overkill_threshold: u32,
    /// Elemental affinities; unlisted elements are neutral.
    pub elements: BTreeMap<Element, Affinity>,
    /// Status resistances out of 255; unlisted statuses are 0. 255 = immune.
    pub status_resistances: BTreeMap<Status, u32>,
    /// Steal table.
    pub steal: StealTable,
    /// The two item drop slots.
    pub drops: Vec<DropSlot>,
    /// Bribe data, if the monster can be bribed.
    pub bribe: Option<BribeInfo>,
    /// Equipment drop parameters.
    pub equipment: EquipmentDropTable,
    /// Actions the monster uses, by name.
    pub actions: Vec<String>,
    /// Zones the monster is encountered in.
    pub zones: Vec<String>,
}

impl Monster {
    /// A stat value, defaulting to 0 when unlisted.
    pub fn stat(&self, stat: Stat) -> u32 {
        self.stats.get(&stat).copied().unwrap_or(0)
    }
}
