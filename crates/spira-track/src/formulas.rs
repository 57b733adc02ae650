//! Pure integer combat and generation formulas.
//!
//! Nothing here touches the stream bank. Every function consumes rolls that
//! an event already drew and returns a plain number. All arithmetic is
//! truncating integer math; floating point would drift off the console.

use spira_data::Affinity;

/// Normal damage ceiling.
pub const DAMAGE_CEILING: u32 = 9_999;
/// Ceiling with Break Damage Limit.
pub const DAMAGE_CEILING_BROKEN: u32 = 99_999;

/// Hit threshold in [0, 255] for a physical attack.
///
/// Built as a truncating multiply-shift chain: the accuracy/evasion ratio is
/// scaled through fixed-point steps, Aim and Reflex shift it by 10 points a
/// stack, and attacker Darkness multiplies by 0x42/0x100.
pub fn hit_threshold(
    accuracy: u32,
    evasion: u32,
    aim_stacks: u32,
    reflex_stacks: u32,
    attacker_darkened: bool,
) -> u32 {
    let ratio = (accuracy << 8) / (accuracy + evasion + 1);
    let mut threshold = (ratio * 230) >> 8;
    threshold = threshold.saturating_add(10 * aim_stacks);
    threshold = threshold.saturating_sub(10 * reflex_stacks);
    if attacker_darkened {
        threshold = (threshold * 0x42) >> 8;
    }
    threshold.min(255)
}

/// Whether a hit-check roll lands under the threshold.
pub fn hit_lands(roll: u32, threshold: u32) -> bool {
    roll % 256 < threshold
}

/// Crit threshold in [0, 255].
pub fn crit_threshold(luck: u32, target_luck: u32, bonus_crit: u32) -> u32 {
    luck.saturating_sub(target_luck / 4).saturating_add(bonus_crit).min(255)
}

/// Whether a crit roll lands under the threshold.
pub fn crit_lands(roll: u32, threshold: u32) -> bool {
    roll % 256 < threshold
}

/// Physical base damage before the modifier chain.
pub fn physical_base(strength: u32, power: u32) -> u32 {
    let st = strength.min(255);
    (st * st / 0x20 + power) * power / 0x10
}

/// Magical base damage before the modifier chain.
pub fn magical_base(magic: u32, power: u32) -> u32 {
    let mg = magic.min(255);
    (mg * mg / 0x20 + power) * power / 0x10
}

/// Everything the modifier chain needs besides the base value.
#[derive(Debug, Clone, Copy)]
pub struct DamageShape {
    /// Target's reaction to the damage element.
    pub affinity: Affinity,
    /// Attack carries an element the attacker's gear boosts.
    pub boosted: bool,
    /// Target has Protect (physical) or Shell (magical) up.
    pub shielded: bool,
    /// Target's relevant defensive stat.
    pub defense: u32,
    /// Defense skipped entirely (Armor/Mental Break on the target).
    pub defense_broken: bool,
    /// Attacker suffers Power/Magic Break.
    pub attacker_broken: bool,
    /// Attacker's Cheer or Focus stacks.
    pub attack_stacks: u32,
    /// Target's Cheer or Focus stacks.
    pub guard_stacks: u32,
    /// Variance roll drawn from the attacker's slot stream.
    pub variance_roll: u32,
    /// The hit crit.
    pub crit: bool,
    /// Target counts as armored.
    pub armored: bool,
    /// Attacker's weapon pierces armor.
    pub piercing: bool,
    /// Attacker lifts the normal ceiling.
    pub break_damage_limit: bool,
}

/// Run the ordered modifier chain over a base damage value.
///
/// Order is fixed: elemental boost, target affinity, Protect/Shell, defense
/// mitigation (skipped under Armor Break), attacker break, Cheer/Focus both
/// ways, variance, crit, armored cut, ceiling. Absorbing targets are the
/// caller's problem; here Absorb yields the full pre-affinity value.
pub fn resolve_damage(base: u32, shape: &DamageShape) -> u32 {
    let mut damage = base;
    if shape.boosted {
        damage = damage * 3 / 2;
    }
    damage = match shape.affinity {
        Affinity::Neutral | Affinity::Absorb => damage,
        Affinity::Resist => damage / 2,
        Affinity::Immune => 0,
        Affinity::Weak => damage * 3 / 2,
    };
    if shape.shielded {
        damage /= 2;
    }
    if !shape.defense_broken {
        damage = damage * 730 / (shape.defense + 730);
    }
    if shape.attacker_broken {
        damage /= 2;
    }
    damage = damage * (15 + shape.attack_stacks) / 15;
    damage = damage * 15 / (15 + shape.guard_stacks);
    damage = (damage * (0xF0 + shape.variance_roll % 0x20)) >> 8;
    if shape.crit {
        damage *= 2;
    }
    if shape.armored && !shape.piercing {
        damage /= 3;
    }
    let ceiling = if shape.break_damage_limit { DAMAGE_CEILING_BROKEN } else { DAMAGE_CEILING };
    damage.min(ceiling)
}

/// Whether a status sticks, given its roll, base chance, and the target's
/// resistance out of 255. A 255 resistance is full immunity.
pub fn status_lands(roll: u32, chance: u32, resistance: u32) -> bool {
    resistance < 255 && roll % 256 < chance.saturating_sub(resistance)
}

/// Steal chance after prior successes: the base halves each time.
pub fn steal_threshold(base_chance: u32, successful_steals: u32) -> u32 {
    base_chance >> successful_steals.min(31)
}

/// Whether a steal roll succeeds.
pub fn steal_lands(roll: u32, threshold: u32) -> bool {
    roll % 255 < threshold
}

/// Whether a rarity roll selects the rare item (split at 32).
pub fn is_rare(roll: u32) -> bool {
    (roll & 255) < 32
}

/// Whether a drop-chance roll clears the table's chance out of 255.
pub fn drop_lands(roll: u32, chance: u32) -> bool {
    roll % 255 < chance
}

/// Slot count of generated equipment from its roll and table modifier.
pub fn equipment_slots(roll: u32, modifier: u32) -> u32 {
    ((roll % 8 + modifier + 4) / 4).clamp(1, 4)
}

/// Number of ability rolls for generated equipment.
pub fn equipment_ability_rolls(roll: u32, modifier: u32) -> u32 {
    ((roll % 8 + modifier) / 4).min(4)
}

/// Index into an 8-entry ability pool from one ability roll. Slot 0 is the
/// forced ability and is never picked at random.
pub fn ability_pool_index(roll: u32) -> usize {
    (roll % 7 + 1) as usize
}

/// CTB tick speed bucket for an agility value.
pub fn tick_speed(agility: u32) -> u32 {
    match agility {
        0 => 28,
        1..=2 => 26,
        3..=4 => 24,
        5..=6 => 22,
        7..=9 => 20,
        10..=13 => 18,
        14..=18 => 16,
        19..=24 => 14,
        25..=33 => 12,
        34..=43 => 10,
        44..=61 => 8,
        62..=97 => 6,
        98..=169 => 5,
        _ => 4,
    }
}

/// A combatant's initial CTB from their tick speed and variance draw.
pub fn initial_ctb(tick_speed: u32, variance_roll: u32) -> u32 {
    tick_speed * 3 - variance_roll % (tick_speed + 1)
}

/// Escape succeeds on a masked byte under 191.
pub fn escape_lands(roll: u32) -> bool {
    (roll & 255) < 191
}

/// Encounter-condition split: below 32 is preemptive, above 223 is ambush.
pub fn encounter_condition_roll(roll: u32, initiative: bool) -> EncounterCondition {
    let byte = if initiative { (roll % 256).saturating_sub(32) } else { roll % 256 };
    if byte < 32 {
        EncounterCondition::Preemptive
    } else if byte > 223 {
        EncounterCondition::Ambush
    } else {
        EncounterCondition::Normal
    }
}

/// How an encounter opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterCondition {
    /// The party acts first.
    Preemptive,
    /// The monsters act first.
    Ambush,
    /// Normal initiative order.
    Normal,
}

impl std::fmt::Display for EncounterCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Preemptive => "Preemptive",
            Self::Ambush => "Ambush",
            Self::Normal => "Normal",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_shape() -> DamageShape {
        DamageShape {
            affinity: Affinity::Neutral,
            boosted: false,
            shielded: false,
            defense: 0,
            defense_broken: false,
            attacker_broken: false,
            attack_stacks: 0,
            guard_stacks: 0,
            variance_roll: 0x10,
            crit: false,
            armored: false,
            piercing: false,
            break_damage_limit: false,
        }
    }

    #[test]
    fn variance_brackets_damage() {
        // 0xF0..=0x10F over 256: damage lands within [15/16, 271/256] of base.
        let base = 1_000;
        let mut shape = plain_shape();
        shape.variance_roll = 0;
        assert_eq!(resolve_damage(base, &shape), 937);
        shape.variance_roll = 0x1F;
        assert_eq!(resolve_damage(base, &shape), (1_000 * 0x10F) >> 8);
    }

    #[test]
    fn immune_target_takes_nothing() {
        let mut shape = plain_shape();
        shape.affinity = Affinity::Immune;
        shape.crit = true;
        assert_eq!(resolve_damage(5_000, &shape), 0);
    }

    #[test]
    fn armored_cut_skipped_by_piercing() {
        let mut shape = plain_shape();
        shape.armored = true;
        let cut = resolve_damage(3_000, &shape);
        shape.piercing = true;
        let pierced = resolve_damage(3_000, &shape);
        assert_eq!(pierced, cut * 3);
    }

    #[test]
    fn ceiling_applies_after_crit() {
        let mut shape = plain_shape();
        shape.crit = true;
        assert_eq!(resolve_damage(50_000, &shape), DAMAGE_CEILING);
        shape.break_damage_limit = true;
        assert!(resolve_damage(50_000, &shape) > DAMAGE_CEILING);
    }

    #[test]
    fn defense_mitigation_gated_by_break() {
        let mut shape = plain_shape();
        shape.defense = 730;
        let mitigated = resolve_damage(2_000, &shape);
        shape.defense_broken = true;
        let broken = resolve_damage(2_000, &shape);
        assert_eq!(broken, mitigated * 2);
    }

    #[test]
    fn steal_halves_per_success() {
        assert_eq!(steal_threshold(255, 0), 255);
        assert_eq!(steal_threshold(255, 1), 127);
        assert_eq!(steal_threshold(255, 3), 31);
        assert_eq!(steal_threshold(255, 40), 0);
    }

    #[test]
    fn status_immunity_is_absolute() {
        assert!(!status_lands(0, 255, 255));
        assert!(status_lands(0, 255, 0));
        assert!(!status_lands(200, 128, 100));
    }

    #[test]
    fn equipment_slot_bounds() {
        for roll in 0..64 {
            for modifier in 0..4 {
                let slots = equipment_slots(roll, modifier);
                assert!((1..=4).contains(&slots));
                assert!(equipment_ability_rolls(roll, modifier) <= 4);
            }
        }
    }

    #[test]
    fn ability_index_skips_forced_slot() {
        for roll in 0..32 {
            let i = ability_pool_index(roll);
            assert!((1..=7).contains(&i));
        }
    }

    #[test]
    fn condition_split() {
        assert_eq!(encounter_condition_roll(10, false), EncounterCondition::Preemptive);
        assert_eq!(encounter_condition_roll(128, false), EncounterCondition::Normal);
        assert_eq!(encounter_condition_roll(230, false), EncounterCondition::Ambush);
        // Initiative shifts a roll that would be Normal into Preemptive.
        assert_eq!(encounter_condition_roll(50, true), EncounterCondition::Preemptive);
        // And drags an Ambush roll back to Normal.
        assert_eq!(encounter_condition_roll(230, true), EncounterCondition::Normal);
    }

    #[test]
    fn initial_ctb_range() {
        for roll in 0..64 {
            let speed = tick_speed(12);
            let ctb = initial_ctb(speed, roll);
            assert!(ctb >= speed * 2 && ctb <= speed * 3);
        }
    }

    #[test]
    fn darkness_guts_accuracy() {
        let clear = hit_threshold(100, 10, 0, 0, false);
        let dark = hit_threshold(100, 10, 0, 0, true);
        assert!(dark < clear / 3);
    }

    #[test]
    fn escape_threshold() {
        assert!(escape_lands(190));
        assert!(!escape_lands(191));
        assert!(escape_lands(256 + 100));
        assert!(!escape_lands(255));
    }
}
