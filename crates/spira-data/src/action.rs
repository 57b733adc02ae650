//! Battle action definitions.

use serde::{Deserialize, Serialize};

use crate::stat::{Buff, Element, Status};

/// Which damage formula an action runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    /// Strength vs. defense.
    Physical,
    /// Magic vs. magic defense.
    Magical,
    /// Fixed or formula-free damage (items, fixed-power specials).
    Special,
    /// No damage component at all.
    None,
}

/// How the action picks its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// One chosen enemy; falls back to a target-stream roll when unspecified.
    Single,
    /// One enemy picked by the actor's target stream.
    RandomEnemy,
    /// Every living enemy.
    AllEnemies,
    /// One chosen ally.
    Ally,
    /// The actor itself.
    SelfOnly,
}

/// A status an action tries to inflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusApplication {
    /// The status.
    pub status: Status,
    /// Infliction chance out of 255 before resistance.
    pub chance: u32,
    /// Stacks (turns for duration-based statuses) granted on success.
    pub stacks: u32,
}

/// A battle action a character or monster can take.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Lookup name (lowercase, underscores).
    pub name: String,
    /// CTB rank; higher ranks push the next turn further out.
    pub rank: u32,
    /// Damage formula family.
    pub damage: DamageKind,
    /// Attack power fed into the damage formula.
    pub power: u32,
    /// Element of the damage, if any.
    pub element: Option<Element>,
    /// Whether the action runs the hit check.
    pub can_miss: bool,
    /// Whether the action runs the crit check.
    pub can_crit: bool,
    /// Number of hits; each hit draws its own rolls.
    pub hits: u32,
    /// Targeting behavior.
    pub target: TargetMode,
    /// Statuses the action tries to inflict on damaged targets.
    pub statuses: Vec<StatusApplication>,
    /// Buff granted to the actor's party on use.
    pub buff: Option<Buff>,
    /// Whether the damage value heals instead of hurting.
    pub heals: bool,
    /// MP cost deducted from the actor.
    pub mp_cost: u32,
}

impl Action {
    /// A plain physical attack shape with the given name and power.
    pub fn physical(name: &str, power: u32) -> Self {
        Self {
            name: name.into(),
            rank: 3,
            damage: DamageKind::Physical,
            power,
            element: None,
            can_miss: true,
            can_crit: true,
            hits: 1,
            target: TargetMode::Single,
            statuses: Vec::new(),
            buff: None,
            heals: false,
            mp_cost: 0,
        }
    }

    /// A single-target spell shape with the given name, power, and element.
    pub fn spell(name: &str, power: u32, element: Element, mp_cost: u32) -> Self {
        Self {
            name: name.into(),
            rank: 3,
            damage: DamageKind::Magical,
            power,
            element: Some(element),
            can_miss: false,
            can_crit: false,
            hits: 1,
            target: TargetMode::Single,
            statuses: Vec::new(),
            buff: None,
            heals: false,
            mp_cost,
        }
    }

    /// Whether the action needs any spoken casting (blocked by Silence).
    pub fn is_magical(&self) -> bool {
        self.damage == DamageKind::Magical || self.heals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_shape() {
        let a = Action::physical("attack", 16);
        assert_eq!(a.damage, DamageKind::Physical);
        assert!(a.can_miss);
        assert!(a.can_crit);
        assert_eq!(a.hits, 1);
        assert!(!a.is_magical());
    }

    #[test]
    fn spell_shape() {
        let a = Action::spell("fire", 14, Element::Fire, 4);
        assert_eq!(a.damage, DamageKind::Magical);
        assert!(!a.can_miss);
        assert!(!a.can_crit);
        assert_eq!(a.element, Some(Element::Fire));
        assert!(a.is_magical());
    }

    #[test]
    fn action_json_roundtrip() {
        let mut a = Action::physical("dark_attack", 16);
        a.statuses.push(StatusApplication { status: Status::Darkness, chance: 255, stacks: 3 });
        let json = serde_json::to_string(&a).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back.statuses.len(), 1);
        assert_eq!(back.statuses[0].status, Status::Darkness);
    }
}
