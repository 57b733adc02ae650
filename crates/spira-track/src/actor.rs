//! Per-combatant battle state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spira_data::{
    Affinity, AutoAbility, Buff, Character, Element, Equipment, EquipmentKind, Monster, Stat,
    Status,
};

use crate::formulas;

/// Who an actor is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorId {
    /// A playable character.
    Character(Character),
    /// A monster on the field, by prize-table name and battle index.
    Monster {
        /// Prize-table lookup name.
        name: String,
        /// Position within the monster party.
        index: usize,
    },
}

/// Mutable combat state for one character or monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    /// Identity.
    pub id: ActorId,
    /// Battle slot; selects the capped per-slot stream range.
    pub slot: usize,
    /// Base stats before equipment bonuses.
    pub stats: BTreeMap<Stat, u32>,
    /// Current HP, clamped to the computed maximum.
    pub current_hp: u32,
    /// Current MP, clamped to the computed maximum.
    pub current_mp: u32,
    /// Active statuses with their stack counts.
    pub statuses: BTreeMap<Status, u32>,
    /// Active buffs, 0..=5 stacks each.
    pub buffs: BTreeMap<Buff, u32>,
    /// Turn-order counter; the next actor to move sits at 0.
    pub ctb: u32,
    /// Equipped weapon (characters only).
    pub weapon: Option<Equipment>,
    /// Equipped armor (characters only).
    pub armor: Option<Equipment>,
    /// Whether the actor counts as armored against physical damage.
    pub armored: bool,
    /// Poison tick, percent of max HP.
    pub poison_rate: u32,
    /// Innate elemental affinities (monsters).
    pub elements: BTreeMap<Element, Affinity>,
    /// Innate status resistances out of 255 (monsters).
    pub status_resistances: BTreeMap<Status, u32>,
}

impl ActorState {
    /// A character at their base stats, bare-handed.
    pub fn character(character: Character, slot: usize) -> Self {
        let stats: BTreeMap<Stat, u32> = character.base_stats().into_iter().collect();
        let hp = stats.get(&Stat::Hp).copied().unwrap_or(0);
        let mp = stats.get(&Stat::Mp).copied().unwrap_or(0);
        Self {
            id: ActorId::Character(character),
            slot,
            stats,
            current_hp: hp,
            current_mp: mp,
            statuses: BTreeMap::new(),
            buffs: BTreeMap::new(),
            ctb: 0,
            weapon: None,
            armor: None,
            armored: false,
            poison_rate: 5,
            elements: BTreeMap::new(),
            status_resistances: BTreeMap::new(),
        }
    }

    /// A monster instance built from its prize struct.
    pub fn monster(monster: &Monster, index: usize) -> Self {
        let hp = monster.stat(Stat::Hp);
        Self {
            id: ActorId::Monster { name: monster.name.clone(), index },
            slot: index,
            stats: monster.stats.clone(),
            current_hp: hp,
            current_mp: monster.stat(Stat::Mp),
            statuses: BTreeMap::new(),
            buffs: BTreeMap::new(),
            ctb: 0,
            weapon: None,
            armor: None,
            armored: monster.armored,
            poison_rate: monster.poison_rate,
            elements: monster.elements.clone(),
            status_resistances: monster.status_resistances.clone(),
        }
    }

    /// Display name.
    pub fn name(&self) -> String {
        match &self.id {
            ActorId::Character(c) => c.to_string(),
            ActorId::Monster { name, index } => {
                if *index == 0 {
                    name.clone()
                } else {
                    format!("{name} {}", index + 1)
                }
            }
        }
    }

    fn equipment_bonus(&self, stat: Stat) -> u32 {
        let mut bonus = 0;
        for equipment in [&self.weapon, &self.armor].into_iter().flatten() {
            for ability in &equipment.abilities {
                if let Some((s, pct)) = ability.stat_bonus()
                    && s == stat
                {
                    bonus += pct;
                }
            }
        }
        bonus
    }

    /// A base stat with equipment percentage bonuses folded in.
    pub fn stat(&self, stat: Stat) -> u32 {
        let base = self.stats.get(&stat).copied().unwrap_or(0);
        let boosted = base * (100 + self.equipment_bonus(stat)) / 100;
        boosted.min(stat.cap())
    }

    /// Effective maximum HP.
    pub fn max_hp(&self) -> u32 {
        self.stat(Stat::Hp)
    }

    /// Effective maximum MP.
    pub fn max_mp(&self) -> u32 {
        self.stat(Stat::Mp)
    }

    /// Set HP, clamping to max. Hitting 0 applies Death.
    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp());
        if self.current_hp == 0 {
            self.statuses.insert(Status::Death, 1);
        }
    }

    /// Subtract damage, saturating at 0.
    pub fn take_damage(&mut self, amount: u32) {
        self.set_hp(self.current_hp.saturating_sub(amount));
    }

    /// Restore HP up to max; does nothing for the dead.
    pub fn heal(&mut self, amount: u32) {
        if !self.has(Status::Death) {
            self.set_hp(self.current_hp.saturating_add(amount));
        }
    }

    /// Spend MP, saturating at 0.
    pub fn spend_mp(&mut self, amount: u32) {
        self.current_mp = self.current_mp.saturating_sub(amount);
    }

    /// Whether a status is active.
    pub fn has(&self, status: Status) -> bool {
        self.statuses.contains_key(&status)
    }

    /// Apply a status, keeping the larger stack count on overlap.
    pub fn add_status(&mut self, status: Status, stacks: u32) {
        let entry = self.statuses.entry(status).or_insert(0);
        *entry = (*entry).max(stacks.max(1));
        if status == Status::Death {
            self.current_hp = 0;
        }
        // Haste and Slow displace each other.
        match status {
            Status::Haste => {
                self.statuses.remove(&Status::Slow);
            }
            Status::Slow => {
                self.statuses.remove(&Status::Haste);
            }
            _ => {}
        }
    }

    /// Remove a status if present.
    pub fn remove_status(&mut self, status: Status) {
        self.statuses.remove(&status);
    }

    /// Add one buff stack, capped at [`Buff::MAX_STACKS`].
    pub fn add_buff(&mut self, buff: Buff) {
        let entry = self.buffs.entry(buff).or_insert(0);
        *entry = (*entry + 1).min(Buff::MAX_STACKS);
    }

    /// Buff stack count.
    pub fn buff(&self, buff: Buff) -> u32 {
        self.buffs.get(&buff).copied().unwrap_or(0)
    }

    /// Dead, petrified, or fled.
    pub fn is_out(&self) -> bool {
        self.has(Status::Death) || self.has(Status::Petrify) || self.has(Status::Escaped)
    }

    /// Able to take a turn right now.
    pub fn can_act(&self) -> bool {
        !self.is_out() && !self.has(Status::Sleep)
    }

    /// Elements the weapon strikes with.
    pub fn strike_elements(&self) -> Vec<Element> {
        self.weapon.as_ref().map(Equipment::strike_elements).unwrap_or_default()
    }

    /// Statuses the weapon tries to inflict on hit, with chances.
    pub fn touch_statuses(&self) -> Vec<(Status, u32)> {
        self.weapon.as_ref().map(Equipment::touch_statuses).unwrap_or_default()
    }

    /// Whether the weapon ignores the armored damage cut.
    pub fn piercing(&self) -> bool {
        self.weapon.as_ref().is_some_and(|w| w.has(AutoAbility::Piercing))
    }

    /// Crit bonus contributed by equipment.
    pub fn bonus_crit(&self) -> u32 {
        [&self.weapon, &self.armor]
            .into_iter()
            .flatten()
            .map(|e| e.bonus_crit)
            .sum()
    }

    /// Whether any equipment lifts the 9_999 damage ceiling.
    pub fn breaks_damage_limit(&self) -> bool {
        self.weapon.as_ref().is_some_and(|w| w.has(AutoAbility::BreakDamageLimit))
    }

    /// Affinity against an element: armor proofs/eaters first, then innate.
    pub fn affinity(&self, element: Element) -> Affinity {
        if let Some(armor) = &self.armor {
            for ability in &armor.abilities {
                if let Some((e, affinity)) = ability.elemental_defense()
                    && e == element
                {
                    return affinity;
                }
            }
        }
        self.elements.get(&element).copied().unwrap_or_default()
    }

    /// Resistance against a status out of 255, armor proofs counting as 255.
    pub fn status_resistance(&self, status: Status) -> u32 {
        if let Some(armor) = &self.armor {
            for ability in &armor.abilities {
                if ability.proof_status() == Some(status) {
                    return 255;
                }
            }
        }
        self.status_resistances.get(&status).copied().unwrap_or(0)
    }

    /// Statuses granted automatically by equipment.
    pub fn auto_statuses(&self) -> Vec<Status> {
        self.armor.as_ref().map(Equipment::auto_statuses).unwrap_or_default()
    }

    /// Equip a piece of gear into its kind's slot.
    pub fn equip(&mut self, equipment: Equipment) {
        match equipment.kind {
            EquipmentKind::Weapon => self.weapon = Some(equipment),
            EquipmentKind::Armor => self.armor = Some(equipment),
        }
        // Re-clamp in case an HP/MP bonus was removed.
        self.current_hp = self.current_hp.min(self.max_hp());
        self.current_mp = self.current_mp.min(self.max_mp());
    }

    /// CTB cost of one turn at the given action rank, after Haste/Slow.
    pub fn turn_cost(&self, rank: u32) -> u32 {
        let speed = formulas::tick_speed(self.stat(Stat::Agility));
        let speed = if self.has(Status::Haste) {
            (speed / 2).max(1)
        } else if self.has(Status::Slow) {
            speed * 2
        } else {
            speed
        };
        speed * rank.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hp_applies_death() {
        let mut actor = ActorState::character(Character::Tidus, 0);
        actor.take_damage(actor.max_hp() + 500);
        assert_eq!(actor.current_hp, 0);
        assert!(actor.has(Status::Death));
    }

    #[test]
    fn heal_does_not_revive() {
        let mut actor = ActorState::character(Character::Tidus, 0);
        actor.take_damage(actor.max_hp());
        actor.heal(100);
        assert_eq!(actor.current_hp, 0);
        assert!(actor.has(Status::Death));
    }

    #[test]
    fn heal_clamps_to_max() {
        let mut actor = ActorState::character(Character::Yuna, 0);
        actor.take_damage(10);
        actor.heal(9_999);
        assert_eq!(actor.current_hp, actor.max_hp());
    }

    #[test]
    fn buffs_cap_at_five() {
        let mut actor = ActorState::character(Character::Tidus, 0);
        for _ in 0..8 {
            actor.add_buff(Buff::Cheer);
        }
        assert_eq!(actor.buff(Buff::Cheer), 5);
    }

    #[test]
    fn haste_displaces_slow() {
        let mut actor = ActorState::character(Character::Tidus, 0);
        actor.add_status(Status::Slow, 1);
        actor.add_status(Status::Haste, 1);
        assert!(actor.has(Status::Haste));
        assert!(!actor.has(Status::Slow));
    }

    #[test]
    fn hp_bonus_raises_max() {
        use spira_data::AutoAbility;
        let mut actor = ActorState::character(Character::Tidus, 0);
        let base_max = actor.max_hp();
        actor.equip(Equipment::new(
            Character::Tidus,
            EquipmentKind::Armor,
            1,
            vec![AutoAbility::HpPlus10],
            0,
            0,
        ));
        assert_eq!(actor.max_hp(), base_max * 110 / 100);
    }

    #[test]
    fn status_stacks_keep_larger() {
        let mut actor = ActorState::character(Character::Tidus, 0);
        actor.add_status(Status::Sleep, 3);
        actor.add_status(Status::Sleep, 1);
        assert_eq!(actor.statuses[&Status::Sleep], 3);
    }
}
