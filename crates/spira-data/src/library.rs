//! The data library: every table the tracker consults at runtime.
//!
//! Ships with built-in presets covering the opening stretch of the game and
//! can be extended from JSON files before a session starts.

use std::collections::BTreeMap;

use crate::action::{Action, DamageKind, StatusApplication, TargetMode};
use crate::autoability::AutoAbility;
use crate::character::Character;
use crate::equipment::Equipment;
use crate::error::{DataError, DataResult};
use crate::item::Item;
use crate::monster::{BribeInfo, DropSlot, EquipmentDropTable, ItemDrop, Monster, StealTable};
use crate::stat::{Affinity, Buff, Element, Stat, Status};

/// Monster and action tables, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct DataLibrary {
    monsters: BTreeMap<String, Monster>,
    actions: BTreeMap<String, Action>,
}

fn normalize(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

impl DataLibrary {
    /// An empty library.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in preset tables.
    pub fn builtin() -> Self {
        let mut lib = Self::default();
        for monster in presets::monsters() {
            lib.insert_monster(monster);
        }
        for action in presets::actions() {
            lib.insert_action(action);
        }
        lib
    }

    /// Add or replace a monster.
    pub fn insert_monster(&mut self, monster: Monster) {
        self.monsters.insert(normalize(&monster.name), monster);
    }

    /// Add or replace an action.
    pub fn insert_action(&mut self, action: Action) {
        self.actions.insert(normalize(&action.name), action);
    }

    /// Look up a monster by name.
    pub fn monster(&self, name: &str) -> DataResult<&Monster> {
        self.monsters
            .get(&normalize(name))
            .ok_or_else(|| DataError::UnknownMonster(name.to_string()))
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> DataResult<&Action> {
        self.actions
            .get(&normalize(name))
            .ok_or_else(|| DataError::UnknownAction(name.to_string()))
    }

    /// Monsters encountered in a zone, in name order.
    pub fn monsters_in_zone(&self, zone: &str) -> Vec<&Monster> {
        let zone = normalize(zone);
        self.monsters.values().filter(|m| m.zones.iter().any(|z| normalize(z) == zone)).collect()
    }

    /// All monster names, in order.
    pub fn monster_names(&self) -> impl Iterator<Item = &str> {
        self.monsters.keys().map(String::as_str)
    }

    /// Merge monsters from a JSON array, returning how many were loaded.
    pub fn load_monsters_json(&mut self, json: &str) -> DataResult<usize> {
        let monsters: Vec<Monster> =
            serde_json::from_str(json).map_err(|e| DataError::Malformed(e.to_string()))?;
        let count = monsters.len();
        for monster in monsters {
            self.insert_monster(monster);
        }
        Ok(count)
    }

    /// Merge actions from a JSON array, returning how many were loaded.
    pub fn load_actions_json(&mut self, json: &str) -> DataResult<usize> {
        let actions: Vec<Action> =
            serde_json::from_str(json).map_err(|e| DataError::Malformed(e.to_string()))?;
        let count = actions.len();
        for action in actions {
            self.insert_action(action);
        }
        Ok(count)
    }
}

mod presets {
    use super::*;

    fn drop(item: Item, quantity: u32) -> ItemDrop {
        ItemDrop { item, quantity }
    }

    fn slot(chance: u32, common: ItemDrop, rare: ItemDrop) -> DropSlot {
        DropSlot { chance, common, rare }
    }

    /// Hp, strength, defense, magic, magic defense, agility, luck,
    /// evasion, accuracy.
    fn stats(values: [u32; 9]) -> BTreeMap<Stat, u32> {
        const ORDER: [Stat; 9] = [
            Stat::Hp,
            Stat::Strength,
            Stat::Defense,
            Stat::Magic,
            Stat::MagicDefense,
            Stat::Agility,
            Stat::Luck,
            Stat::Evasion,
            Stat::Accuracy,
        ];
        ORDER.into_iter().zip(values).collect()
    }

    /// The same 8-slot pool for every owner.
    fn shared_pools(
        pool: [Option<AutoAbility>; 8],
    ) -> BTreeMap<Character, Vec<Option<AutoAbility>>> {
        Character::all().iter().map(|&c| (c, pool.to_vec())).collect()
    }

    fn basic_equipment(slots_modifier: u32, base_weapon_damage: u32) -> EquipmentDropTable {
        use AutoAbility::*;
        EquipmentDropTable {
            chance: 128,
            slots_modifier,
            ability_rolls_modifier: 0,
            base_weapon_damage,
            bonus_crit: Equipment::STANDARD_BONUS_CRIT,
            weapon_pools: shared_pools([
                Some(Piercing),
                Some(Firestrike),
                Some(Icestrike),
                Some(Lightningstrike),
                Some(Waterstrike),
                Some(Sensor),
                None,
                None,
            ]),
            armor_pools: shared_pools([
                Some(HpPlus10),
                Some(Fireproof),
                Some(Iceproof),
                Some(Lightningproof),
                Some(Waterproof),
                Some(MpPlus10),
                None,
                None,
            ]),
        }
    }

    pub fn monsters() -> Vec<Monster> {
        use AutoAbility::*;
        vec![
            Monster {
                name: "sinscale".into(),
                stats: stats([100, 10, 1, 1, 1, 8, 15, 0, 80]),
                gil: 18,
                armored: false,
                poison_rate: 25,
                zanmato_level: 1,
                overkill_threshold: 150,
                elements: BTreeMap::new(),
                status_resistances: BTreeMap::new(),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::Potion, 1),
                    rare: drop(Item::Potion, 2),
                },
                drops: vec![slot(
                    128,
                    drop(Item::AbilitySphere, 1),
                    drop(Item::AbilitySphere, 2),
                )],
                bribe: None,
                equipment: basic_equipment(0, Equipment::STANDARD_BASE_DAMAGE),
                actions: vec!["spines".into()],
                zones: vec!["zanarkand".into(), "baaj".into()],
            },
            Monster {
                name: "klikk".into(),
                stats: stats([1500, 17, 5, 1, 1, 12, 15, 0, 90]),
                gil: 100,
                armored: false,
                poison_rate: 25,
                zanmato_level: 2,
                overkill_threshold: 2250,
                elements: BTreeMap::new(),
                status_resistances: BTreeMap::from([
                    (Status::Sleep, 255),
                    (Status::Petrify, 255),
                    (Status::Doom, 255),
                ]),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::Grenade, 1),
                    rare: drop(Item::Grenade, 2),
                },
                drops: vec![
                    slot(255, drop(Item::PowerSphere, 1), drop(Item::PowerSphere, 2)),
                    slot(128, drop(Item::AbilitySphere, 1), drop(Item::AbilitySphere, 2)),
                ],
                bribe: None,
                equipment: basic_equipment(1, Equipment::STANDARD_BASE_DAMAGE),
                actions: vec!["attack".into()],
                zones: vec!["baaj".into()],
            },
            Monster {
                name: "sahagin".into(),
                stats: stats([170, 12, 1, 10, 1, 10, 15, 5, 80]),
                gil: 24,
                armored: false,
                poison_rate: 25,
                zanmato_level: 1,
                overkill_threshold: 255,
                elements: BTreeMap::from([
                    (Element::Water, Affinity::Absorb),
                    (Element::Lightning, Affinity::Weak),
                ]),
                status_resistances: BTreeMap::new(),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::FishScale, 1),
                    rare: drop(Item::FishScale, 3),
                },
                drops: vec![slot(
                    128,
                    drop(Item::PowerSphere, 1),
                    drop(Item::ManaSphere, 1),
                )],
                bribe: Some(BribeInfo { cost: 3_400, item: Item::FishScale, quantity: 6 }),
                equipment: basic_equipment(0, Equipment::STANDARD_BASE_DAMAGE),
                actions: vec!["attack".into()],
                zones: vec!["baaj".into(), "besaid".into()],
            },
            Monster {
                name: "dingo".into(),
                stats: stats([125, 10, 1, 1, 1, 11, 15, 5, 80]),
                gil: 22,
                armored: false,
                poison_rate: 25,
                zanmato_level: 1,
                overkill_threshold: 187,
                elements: BTreeMap::new(),
                status_resistances: BTreeMap::new(),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::PhoenixDown, 1),
                    rare: drop(Item::PhoenixDown, 2),
                },
                drops: vec![slot(
                    128,
                    drop(Item::PowerSphere, 1),
                    drop(Item::PowerSphere, 2),
                )],
                bribe: Some(BribeInfo { cost: 2_500, item: Item::PhoenixDown, quantity: 4 }),
                equipment: basic_equipment(0, Equipment::STANDARD_BASE_DAMAGE),
                actions: vec!["attack".into()],
                zones: vec!["besaid".into()],
            },
            Monster {
                name: "condor".into(),
                stats: stats([95, 8, 1, 1, 1, 13, 15, 25, 60]),
                gil: 18,
                armored: false,
                poison_rate: 25,
                zanmato_level: 1,
                overkill_threshold: 142,
                elements: BTreeMap::new(),
                status_resistances: BTreeMap::new(),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::SpeedSphere, 1),
                    rare: drop(Item::SpeedSphere, 2),
                },
                drops: vec![slot(
                    128,
                    drop(Item::SpeedSphere, 1),
                    drop(Item::SpeedSphere, 2),
                )],
                bribe: Some(BribeInfo { cost: 1_900, item: Item::SpeedSphere, quantity: 2 }),
                equipment: basic_equipment(0, Equipment::STANDARD_BASE_DAMAGE),
                actions: vec!["attack".into()],
                zones: vec!["besaid".into()],
            },
            Monster {
                name: "water_flan".into(),
                stats: stats([315, 5, 100, 12, 1, 7, 15, 0, 100]),
                gil: 30,
                armored: true,
                poison_rate: 25,
                zanmato_level: 1,
                overkill_threshold: 472,
                elements: BTreeMap::from([
                    (Element::Water, Affinity::Absorb),
                    (Element::Lightning, Affinity::Weak),
                ]),
                status_resistances: BTreeMap::from([(Status::Petrify, 128)]),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::FishScale, 1),
                    rare: drop(Item::FishScale, 2),
                },
                drops: vec![slot(
                    128,
                    drop(Item::ManaSphere, 1),
                    drop(Item::ManaSphere, 2),
                )],
                bribe: Some(BribeInfo { cost: 6_300, item: Item::FishScale, quantity: 9 }),
                equipment: basic_equipment(0, Equipment::STANDARD_BASE_DAMAGE),
                actions: vec!["water".into()],
                zones: vec!["besaid".into()],
            },
            Monster {
                name: "bomb".into(),
                stats: stats([850, 12, 20, 16, 20, 9, 15, 0, 90]),
                gil: 95,
                armored: false,
                poison_rate: 25,
                zanmato_level: 1,
                overkill_threshold: 1275,
                elements: BTreeMap::from([
                    (Element::Fire, Affinity::Absorb),
                    (Element::Ice, Affinity::Weak),
                ]),
                status_resistances: BTreeMap::from([(Status::Sleep, 128)]),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::BombFragment, 1),
                    rare: drop(Item::BombFragment, 2),
                },
                drops: vec![slot(
                    128,
                    drop(Item::PowerSphere, 1),
                    drop(Item::PowerSphere, 2),
                )],
                bribe: Some(BribeInfo { cost: 17_000, item: Item::BombFragment, quantity: 16 }),
                equipment: {
                    let mut table = basic_equipment(1, 18);
                    for pool in table.weapon_pools.values_mut() {
                        pool[1] = Some(Firestrike);
                    }
                    for pool in table.armor_pools.values_mut() {
                        pool[1] = Some(Fireproof);
                    }
                    table
                },
                actions: vec!["fire".into()],
                zones: vec!["mi'ihen".into()],
            },
            Monster {
                name: "dual_horn".into(),
                stats: stats([1875, 22, 30, 1, 1, 10, 15, 0, 80]),
                gil: 170,
                armored: true,
                poison_rate: 25,
                zanmato_level: 2,
                overkill_threshold: 2812,
                elements: BTreeMap::new(),
                status_resistances: BTreeMap::from([
                    (Status::Darkness, 128),
                    (Status::Petrify, 128),
                ]),
                steal: StealTable {
                    base_chance: 255,
                    common: drop(Item::HiPotion, 1),
                    rare: drop(Item::StaminaSpring, 1),
                },
                drops: vec![slot(
                    128,
                    drop(Item::PowerSphere, 1),
                    drop(Item::PowerSphere, 3),
                )],
                bribe: Some(BribeInfo { cost: 37_500, item: Item::StaminaSpring, quantity: 2 }),
                equipment: basic_equipment(1, 18),
                actions: vec!["attack".into()],
                zones: vec!["mi'ihen".into()],
            },
        ]
    }

    pub fn actions() -> Vec<Action> {
        let status = |status, chance, stacks| StatusApplication { status, chance, stacks };
        let mut actions = vec![
            Action::physical("attack", 16),
            Action::physical("spines", 12),
            Action::spell("fire", 14, Element::Fire, 4),
            Action::spell("thunder", 14, Element::Lightning, 4),
            Action::spell("blizzard", 14, Element::Ice, 4),
            Action::spell("water", 14, Element::Water, 4),
        ];

        for (name, inflicted) in [
            ("power_break", Status::PowerBreak),
            ("magic_break", Status::MagicBreak),
            ("armor_break", Status::ArmorBreak),
            ("mental_break", Status::MentalBreak),
        ] {
            let mut a = Action::physical(name, 16);
            a.mp_cost = 8;
            a.statuses.push(status(inflicted, 255, 1));
            actions.push(a);
        }

        for (name, inflicted) in [
            ("dark_attack", Status::Darkness),
            ("silence_attack", Status::Silence),
            ("sleep_attack", Status::Sleep),
        ] {
            let mut a = Action::physical(name, 16);
            a.mp_cost = 5;
            a.statuses.push(status(inflicted, 255, 3));
            actions.push(a);
        }

        let mut cure = Action {
            name: "cure".into(),
            rank: 3,
            damage: DamageKind::Magical,
            power: 12,
            element: None,
            can_miss: false,
            can_crit: false,
            hits: 1,
            target: TargetMode::Ally,
            statuses: Vec::new(),
            buff: None,
            heals: true,
            mp_cost: 4,
        };
        actions.push(cure.clone());
        cure.name = "cura".into();
        cure.power = 30;
        cure.mp_cost = 10;
        actions.push(cure);

        for (name, inflicted) in [("haste", Status::Haste), ("slow", Status::Slow)] {
            actions.push(Action {
                name: name.into(),
                rank: 3,
                damage: DamageKind::None,
                power: 0,
                element: None,
                can_miss: false,
                can_crit: false,
                hits: 1,
                target: if name == "haste" { TargetMode::Ally } else { TargetMode::Single },
                statuses: vec![status(inflicted, 255, 1)],
                buff: None,
                heals: false,
                mp_cost: 8,
            });
        }

        for (name, buff) in [
            ("cheer", Buff::Cheer),
            ("focus", Buff::Focus),
            ("aim", Buff::Aim),
            ("reflex", Buff::Reflex),
        ] {
            actions.push(Action {
                name: name.into(),
                rank: 2,
                damage: DamageKind::None,
                power: 0,
                element: None,
                can_miss: false,
                can_crit: false,
                hits: 1,
                target: TargetMode::SelfOnly,
                statuses: Vec::new(),
                buff: Some(buff),
                heals: false,
                mp_cost: 0,
            });
        }

        // Stone Gaze petrifies at half rate; Venom pairs damage with Poison.
        let mut stone_gaze = Action::physical("stone_gaze", 0);
        stone_gaze.damage = DamageKind::None;
        stone_gaze.can_miss = false;
        stone_gaze.can_crit = false;
        stone_gaze.statuses.push(status(Status::Petrify, 128, 1));
        actions.push(stone_gaze);

        let mut venom = Action::physical("venom", 12);
        venom.statuses.push(status(Status::Poison, 255, 1));
        actions.push(venom);

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::EquipmentKind;

    #[test]
    fn builtin_monster_lookup() {
        let lib = DataLibrary::builtin();
        assert!(lib.monster("sinscale").is_ok());
        assert!(lib.monster("Dual Horn").is_ok());
        assert_eq!(
            lib.monster("chocobo_eater"),
            Err(DataError::UnknownMonster("chocobo_eater".into()))
        );
    }

    #[test]
    fn builtin_action_lookup() {
        let lib = DataLibrary::builtin();
        let attack = lib.action("attack").unwrap();
        assert_eq!(attack.damage, DamageKind::Physical);
        let cheer = lib.action("cheer").unwrap();
        assert_eq!(cheer.buff, Some(Buff::Cheer));
        assert!(lib.action("ultima").is_err());
    }

    #[test]
    fn zone_filter() {
        let lib = DataLibrary::builtin();
        let besaid = lib.monsters_in_zone("besaid");
        assert!(besaid.iter().any(|m| m.name == "dingo"));
        assert!(besaid.iter().any(|m| m.name == "water_flan"));
        assert!(!besaid.iter().any(|m| m.name == "bomb"));
    }

    #[test]
    fn load_monsters_from_json() {
        let mut lib = DataLibrary::builtin();
        let mut extra = lib.monster("dingo").unwrap().clone();
        extra.name = "garm".into();
        let json = serde_json::to_string(&vec![extra]).unwrap();
        assert_eq!(lib.load_monsters_json(&json), Ok(1));
        assert!(lib.monster("garm").is_ok());
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut lib = DataLibrary::empty();
        assert!(matches!(lib.load_actions_json("{not json"), Err(DataError::Malformed(_))));
    }

    #[test]
    fn bomb_pool_forces_fire() {
        let lib = DataLibrary::builtin();
        let bomb = lib.monster("bomb").unwrap();
        let pool = bomb.equipment.pool(EquipmentKind::Weapon, Character::Tidus);
        assert_eq!(pool[1], Some(AutoAbility::Firestrike));
    }
}
