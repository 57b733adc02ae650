//! The equipment model and its derived name and value.

use serde::{Deserialize, Serialize};

use crate::autoability::AutoAbility;
use crate::character::Character;
use crate::stat::{Element, Status};

/// Whether a piece of equipment is a weapon or armor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentKind {
    /// Attacks with it.
    Weapon,
    /// Defends with it.
    Armor,
}

impl std::fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weapon => write!(f, "weapon"),
            Self::Armor => write!(f, "armor"),
        }
    }
}

/// A generated or equipped piece of gear.
///
/// Name and gil value are not stored: both are pure functions of the fields
/// below, derived through an ordered-priority rule walk over the ability
/// set (first matching rule wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// The character the piece drops for / is equipped by.
    pub owner: Character,
    /// Weapon or armor.
    pub kind: EquipmentKind,
    /// Number of ability slots, always within 1..=4.
    pub slots: u32,
    /// Occupied slots: at most 4 distinct autoabilities.
    pub abilities: Vec<AutoAbility>,
    /// Weapon damage constant used by the physical damage formula.
    pub base_weapon_damage: u32,
    /// Crit chance bonus granted by the piece.
    pub bonus_crit: u32,
}

impl Equipment {
    /// Weapon damage constant stamped on ordinary field drops.
    pub const STANDARD_BASE_DAMAGE: u32 = 16;
    /// Crit bonus stamped on ordinary field drops.
    pub const STANDARD_BONUS_CRIT: u32 = 3;

    /// Build a piece of equipment, normalizing slots and abilities.
    ///
    /// Slots clamp into 1..=4; duplicate abilities collapse; abilities that
    /// do not fit the kind (armor abilities on a weapon and vice versa) are
    /// dropped; at most 4 (and never more than `slots`) abilities are kept,
    /// in the order given.
    pub fn new(
        owner: Character,
        kind: EquipmentKind,
        slots: u32,
        abilities: Vec<AutoAbility>,
        base_weapon_damage: u32,
        bonus_crit: u32,
    ) -> Self {
        let slots = slots.clamp(1, 4);
        let mut kept: Vec<AutoAbility> = Vec::new();
        for ability in abilities {
            let fits = ability.is_weapon_ability() == (kind == EquipmentKind::Weapon);
            if fits && !kept.contains(&ability) && kept.len() < slots as usize {
                kept.push(ability);
            }
        }
        Self {
            owner,
            kind,
            slots,
            abilities: kept,
            base_weapon_damage,
            bonus_crit,
        }
    }

    /// Whether the piece carries a specific ability.
    pub fn has(&self, ability: AutoAbility) -> bool {
        self.abilities.contains(&ability)
    }

    /// Elements the weapon adds to its attacks.
    pub fn strike_elements(&self) -> Vec<Element> {
        self.abilities
            .iter()
            .filter_map(|a| a.strike_element())
            .collect()
    }

    /// Statuses (with base chances) the weapon may inflict on hit.
    pub fn touch_statuses(&self) -> Vec<(Status, u32)> {
        self.abilities
            .iter()
            .filter_map(|a| a.touch_status())
            .collect()
    }

    /// Statuses the piece keeps permanently applied on its wearer.
    pub fn auto_statuses(&self) -> Vec<Status> {
        self.abilities
            .iter()
            .filter_map(|a| a.auto_status())
            .collect()
    }

    /// The piece's display name, derived from the ability set.
    pub fn name(&self) -> String {
        match self.kind {
            EquipmentKind::Weapon => self.weapon_name(),
            EquipmentKind::Armor => self.armor_name(),
        }
    }

    /// Gil value of the piece: a slot premium plus the ability values.
    pub fn gil_value(&self) -> u32 {
        50 * self.slots + self.abilities.iter().map(|a| a.gil_value()).sum::<u32>()
    }

    fn base_type(&self) -> &'static str {
        match (self.kind, self.owner) {
            (EquipmentKind::Weapon, Character::Tidus) => "Longsword",
            (EquipmentKind::Weapon, Character::Yuna) => "Staff",
            (EquipmentKind::Weapon, Character::Auron) => "Katana",
            (EquipmentKind::Weapon, Character::Kimahri) => "Spear",
            (EquipmentKind::Weapon, Character::Wakka) => "Ball",
            (EquipmentKind::Weapon, Character::Lulu) => "Doll",
            (EquipmentKind::Weapon, Character::Rikku) => "Claw",
            (EquipmentKind::Armor, Character::Tidus) => "Shield",
            (EquipmentKind::Armor, Character::Yuna) => "Ring",
            (EquipmentKind::Armor, Character::Auron) => "Bracer",
            (EquipmentKind::Armor, Character::Kimahri) => "Armlet",
            (EquipmentKind::Armor, Character::Wakka) => "Armguard",
            (EquipmentKind::Armor, Character::Lulu) => "Bangle",
            (EquipmentKind::Armor, Character::Rikku) => "Targe",
        }
    }

    fn celestial_name(&self) -> &'static str {
        match self.owner {
            Character::Tidus => "Caladbolg",
            Character::Yuna => "Nirvana",
            Character::Auron => "Masamune",
            Character::Kimahri => "Spirit Lance",
            Character::Wakka => "World Champion",
            Character::Lulu => "Onion Knight",
            Character::Rikku => "Godhand",
        }
    }

    fn weapon_name(&self) -> String {
        use AutoAbility::*;
        let base = self.base_type();

        if self.has(BreakDamageLimit) {
            return self.celestial_name().to_string();
        }
        let touches = self.touch_statuses().len();
        if touches >= 3 {
            return format!("Wicked {base}");
        }
        if self.has(Stonetouch) {
            return format!("Basilisk {base}");
        }
        if self.has(Poisontouch) {
            return format!("Venomous {base}");
        }
        if self.has(Sleeptouch) {
            return format!("Dozing {base}");
        }
        if self.has(Silencetouch) {
            return format!("Muting {base}");
        }
        if self.has(Darktouch) {
            return format!("Blinding {base}");
        }
        let strikes = self.strike_elements();
        if strikes.len() >= 2 {
            return format!("Prismatic {base}");
        }
        if let Some(element) = strikes.first() {
            let prefix = match element {
                Element::Fire => "Flame",
                Element::Ice => "Frost",
                Element::Lightning => "Thunder",
                Element::Water => "Tidal",
                Element::Holy => "Hallowed",
            };
            return format!("{prefix} {base}");
        }
        if self.has(FirstStrike) {
            return format!("Sonic {base}");
        }
        if self.has(Initiative) {
            return format!("Vanguard {base}");
        }
        if self.has(Counterattack) {
            return format!("Reprisal {base}");
        }
        if self.has(Piercing) {
            return format!("Keen {base}");
        }
        if self.has(StrengthPlus20) {
            return format!("Mighty {base}");
        }
        if self.has(StrengthPlus10) {
            return format!("Stout {base}");
        }
        if self.has(MagicPlus20) {
            return format!("Sorcery {base}");
        }
        if self.has(MagicPlus10) {
            return format!("Mage's {base}");
        }
        if self.has(Sensor) {
            return format!("Scout's {base}");
        }
        base.to_string()
    }

    fn armor_name(&self) -> String {
        use AutoAbility::*;
        let base = self.base_type();

        if self.has(BreakHpLimit) {
            return format!("Imperial {base}");
        }

        // Elemental defense tier. This counts ABILITIES, not distinct
        // elements: Fireproof + Fire Eater ranks as two, same as
        // Fireproof + Iceproof. Faithful to the original tool; pinned by
        // armor_name_same_element_pair_counts_as_two below.
        let elemental: Vec<_> = self
            .abilities
            .iter()
            .filter_map(|a| a.elemental_defense())
            .collect();
        match elemental.len() {
            4 => return format!("Tetra {base}"),
            3 => return format!("Triple {base}"),
            2 => return format!("Twin {base}"),
            1 => {
                let prefix = match elemental[0].0 {
                    Element::Fire => "Crimson",
                    Element::Ice => "Glacial",
                    Element::Lightning => "Voltaic",
                    Element::Water => "Abyssal",
                    Element::Holy => "Radiant",
                };
                return format!("{prefix} {base}");
            }
            _ => {}
        }

        if self.has(AutoHaste) {
            return format!("Swift {base}");
        }
        if self.has(AutoRegen) {
            return format!("Verdant {base}");
        }
        if self.has(AutoShell) {
            return format!("Barrier {base}");
        }
        if self.has(AutoProtect) {
            return format!("Bulwark {base}");
        }
        if self.has(Stoneproof) {
            return format!("Medusa {base}");
        }
        if self.has(Poisonproof) {
            return format!("Serum {base}");
        }
        if self.has(Sleepproof) {
            return format!("Insomniac {base}");
        }
        if self.has(Silenceproof) {
            return format!("Echoing {base}");
        }
        if self.has(Darkproof) {
            return format!("Lucid {base}");
        }
        if self.has(HpPlus30) {
            return format!("Stalwart {base}");
        }
        if self.has(HpPlus10) {
            return format!("Healthy {base}");
        }
        if self.has(MpPlus30) {
            return format!("Sage's {base}");
        }
        if self.has(MpPlus10) {
            return format!("Adept's {base}");
        }
        base.to_string()
    }
}

impl std::fmt::Display for Equipment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {} slots",
            self.name(),
            self.owner,
            self.slots
        )?;
        for ability in &self.abilities {
            write!(f, ", {ability}")?;
        }
        write!(f, ")")
    }
}
