//! Stats, statuses, buffs, and elements.

use serde::{Deserialize, Serialize};

/// A numeric actor stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    /// Maximum hit points.
    Hp,
    /// Maximum magic points.
    Mp,
    /// Physical attack stat.
    Strength,
    /// Physical mitigation stat.
    Defense,
    /// Magical attack stat.
    Magic,
    /// Magical mitigation stat.
    MagicDefense,
    /// Turn frequency stat.
    Agility,
    /// Crit and hit luck factor.
    Luck,
    /// Chance to dodge physical attacks.
    Evasion,
    /// Chance to land physical attacks.
    Accuracy,
}

impl Stat {
    /// All stats.
    pub fn all() -> &'static [Self] {
        &[
            Self::Hp,
            Self::Mp,
            Self::Strength,
            Self::Defense,
            Self::Magic,
            Self::MagicDefense,
            Self::Agility,
            Self::Luck,
            Self::Evasion,
            Self::Accuracy,
        ]
    }

    /// Hard cap the game enforces on this stat.
    pub fn cap(self) -> u32 {
        match self {
            Self::Hp => 99_999,
            Self::Mp => 9_999,
            _ => 255,
        }
    }

    /// Parse a stat from a user-supplied name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hp" => Some(Self::Hp),
            "mp" => Some(Self::Mp),
            "strength" | "str" => Some(Self::Strength),
            "defense" | "def" => Some(Self::Defense),
            "magic" | "mag" => Some(Self::Magic),
            "magic_defense" | "magicdefense" | "mdef" => Some(Self::MagicDefense),
            "agility" | "agi" => Some(Self::Agility),
            "luck" => Some(Self::Luck),
            "evasion" | "eva" => Some(Self::Evasion),
            "accuracy" | "acc" => Some(Self::Accuracy),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Hp => "HP",
            Self::Mp => "MP",
            Self::Strength => "Strength",
            Self::Defense => "Defense",
            Self::Magic => "Magic",
            Self::MagicDefense => "Magic Defense",
            Self::Agility => "Agility",
            Self::Luck => "Luck",
            Self::Evasion => "Evasion",
            Self::Accuracy => "Accuracy",
        };
        write!(f, "{name}")
    }
}

/// A status condition. Stack counts track remaining turns where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    /// Knocked out.
    Death,
    /// Turned to stone; may shatter.
    Petrify,
    /// Damage over time at end of turn.
    Poison,
    /// Countdown to Death.
    Doom,
    /// Cannot cast; duration-based.
    Silence,
    /// Cannot act; duration-based.
    Sleep,
    /// Reduced accuracy; duration-based.
    Darkness,
    /// Halves physical damage taken.
    Protect,
    /// Halves magical damage taken.
    Shell,
    /// Bounces spells.
    Reflect,
    /// Gradual healing scaled by elapsed ticks.
    Regen,
    /// Faster turns.
    Haste,
    /// Slower turns.
    Slow,
    /// Physical attack weakened.
    PowerBreak,
    /// Magical attack weakened.
    MagicBreak,
    /// Defense ignored.
    ArmorBreak,
    /// Magic defense ignored.
    MentalBreak,
    /// Defensive stance until the next turn.
    Defend,
    /// Fled the battle.
    Escaped,
}

impl Status {
    /// Statuses cleared at the start of every turn.
    pub fn is_temporary(self) -> bool {
        matches!(self, Self::Defend)
    }

    /// Statuses whose stack count is a remaining-turn duration.
    pub fn is_duration_based(self) -> bool {
        matches!(self, Self::Silence | Self::Sleep | Self::Darkness | Self::Doom)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Death => "Death",
            Self::Petrify => "Petrify",
            Self::Poison => "Poison",
            Self::Doom => "Doom",
            Self::Silence => "Silence",
            Self::Sleep => "Sleep",
            Self::Darkness => "Darkness",
            Self::Protect => "Protect",
            Self::Shell => "Shell",
            Self::Reflect => "Reflect",
            Self::Regen => "Regen",
            Self::Haste => "Haste",
            Self::Slow => "Slow",
            Self::PowerBreak => "Power Break",
            Self::MagicBreak => "Magic Break",
            Self::ArmorBreak => "Armor Break",
            Self::MentalBreak => "Mental Break",
            Self::Defend => "Defend",
            Self::Escaped => "Escaped",
        };
        write!(f, "{name}")
    }
}

/// A stacking battle buff (0..=5 stacks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Buff {
    /// Raises physical damage dealt and lowers physical damage taken.
    Cheer,
    /// Raises magical damage dealt and lowers magical damage taken.
    Focus,
    /// Raises accuracy.
    Aim,
    /// Raises evasion.
    Reflex,
}

impl Buff {
    /// Maximum stack count.
    pub const MAX_STACKS: u32 = 5;
}

impl std::fmt::Display for Buff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cheer => "Cheer",
            Self::Focus => "Focus",
            Self::Aim => "Aim",
            Self::Reflex => "Reflex",
        };
        write!(f, "{name}")
    }
}

/// A damage element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    /// Fire.
    Fire,
    /// Ice.
    Ice,
    /// Lightning.
    Lightning,
    /// Water.
    Water,
    /// Holy.
    Holy,
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fire => "Fire",
            Self::Ice => "Ice",
            Self::Lightning => "Lightning",
            Self::Water => "Water",
            Self::Holy => "Holy",
        };
        write!(f, "{name}")
    }
}

/// How a target reacts to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Affinity {
    /// Full damage.
    #[default]
    Neutral,
    /// Half damage.
    Resist,
    /// No damage.
    Immune,
    /// Damage heals instead.
    Absorb,
    /// Increased damage.
    Weak,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_caps() {
        assert_eq!(Stat::Hp.cap(), 99_999);
        assert_eq!(Stat::Mp.cap(), 9_999);
        assert_eq!(Stat::Strength.cap(), 255);
        assert_eq!(Stat::Luck.cap(), 255);
    }

    #[test]
    fn stat_parse_aliases() {
        assert_eq!(Stat::parse("str"), Some(Stat::Strength));
        assert_eq!(Stat::parse("MDEF"), Some(Stat::MagicDefense));
        assert_eq!(Stat::parse("nonsense"), None);
    }

    #[test]
    fn temporary_statuses() {
        assert!(Status::Defend.is_temporary());
        assert!(!Status::Poison.is_temporary());
    }

    #[test]
    fn duration_statuses() {
        for s in [Status::Silence, Status::Sleep, Status::Darkness, Status::Doom] {
            assert!(s.is_duration_based());
        }
        assert!(!Status::Haste.is_duration_based());
        assert!(!Status::Death.is_duration_based());
    }
}
