//! The playable characters.

use serde::{Deserialize, Serialize};

use crate::stat::Stat;

/// A playable character, in joining order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Character {
    /// The protagonist; party slot 0 in the opening fight.
    Tidus,
    /// The summoner.
    Yuna,
    /// The guardian; party slot 1 in the opening fight.
    Auron,
    /// The Ronso guardian.
    Kimahri,
    /// The blitzball captain.
    Wakka,
    /// The black mage.
    Lulu,
    /// The thief.
    Rikku,
}

impl Character {
    /// All characters in joining order.
    pub fn all() -> &'static [Self] {
        &[
            Self::Tidus,
            Self::Yuna,
            Self::Auron,
            Self::Kimahri,
            Self::Wakka,
            Self::Lulu,
            Self::Rikku,
        ]
    }

    /// Parse a character from a full (case-insensitive) name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tidus" => Some(Self::Tidus),
            "yuna" => Some(Self::Yuna),
            "auron" => Some(Self::Auron),
            "kimahri" => Some(Self::Kimahri),
            "wakka" => Some(Self::Wakka),
            "lulu" => Some(Self::Lulu),
            "rikku" => Some(Self::Rikku),
            _ => None,
        }
    }

    /// Match a character by the first letter of their name.
    ///
    /// This is how the `party` command selects members: each letter of its
    /// argument picks one character.
    pub fn from_initial(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            't' => Some(Self::Tidus),
            'y' => Some(Self::Yuna),
            'a' => Some(Self::Auron),
            'k' => Some(Self::Kimahri),
            'w' => Some(Self::Wakka),
            'l' => Some(Self::Lulu),
            'r' => Some(Self::Rikku),
            _ => None,
        }
    }

    /// Baseline stats at the point the tracker usually starts a run.
    pub fn base_stats(self) -> Vec<(Stat, u32)> {
        let rows: &[(Stat, u32)] = match self {
            Self::Tidus => &[
                (Stat::Hp, 520),
                (Stat::Mp, 12),
                (Stat::Strength, 15),
                (Stat::Defense, 5),
                (Stat::Magic, 5),
                (Stat::MagicDefense, 5),
                (Stat::Agility, 10),
                (Stat::Luck, 18),
                (Stat::Evasion, 10),
                (Stat::Accuracy, 10),
            ],
            Self::Yuna => &[
                (Stat::Hp, 475),
                (Stat::Mp, 84),
                (Stat::Strength, 3),
                (Stat::Defense, 5),
                (Stat::Magic, 20),
                (Stat::MagicDefense, 20),
                (Stat::Agility, 10),
                (Stat::Luck, 17),
                (Stat::Evasion, 30),
                (Stat::Accuracy, 3),
            ],
            Self::Auron => &[
                (Stat::Hp, 1030),
                (Stat::Mp, 33),
                (Stat::Strength, 20),
                (Stat::Defense, 15),
                (Stat::Magic, 4),
                (Stat::MagicDefense, 3),
                (Stat::Agility, 5),
                (Stat::Luck, 17),
                (Stat::Evasion, 5),
                (Stat::Accuracy, 3),
            ],
            Self::Kimahri => &[
                (Stat::Hp, 644),
                (Stat::Mp, 78),
                (Stat::Strength, 16),
                (Stat::Defense, 15),
                (Stat::Magic, 17),
                (Stat::MagicDefense, 5),
                (Stat::Agility, 6),
                (Stat::Luck, 18),
                (Stat::Evasion, 5),
                (Stat::Accuracy, 5),
            ],
            Self::Wakka => &[
                (Stat::Hp, 618),
                (Stat::Mp, 10),
                (Stat::Strength, 14),
                (Stat::Defense, 10),
                (Stat::Magic, 10),
                (Stat::MagicDefense, 5),
                (Stat::Agility, 7),
                (Stat::Luck, 19),
                (Stat::Evasion, 5),
                (Stat::Accuracy, 25),
            ],
            Self::Lulu => &[
                (Stat::Hp, 380),
                (Stat::Mp, 92),
                (Stat::Strength, 5),
                (Stat::Defense, 8),
                (Stat::Magic, 23),
                (Stat::MagicDefense, 10),
                (Stat::Agility, 5),
                (Stat::Luck, 17),
                (Stat::Evasion, 40),
                (Stat::Accuracy, 3),
            ],
            Self::Rikku => &[
                (Stat::Hp, 444),
                (Stat::Mp, 20),
                (Stat::Strength, 10),
                (Stat::Defense, 8),
                (Stat::Magic, 10),
                (Stat::MagicDefense, 10),
                (Stat::Agility, 16),
                (Stat::Luck, 18),
                (Stat::Evasion, 5),
                (Stat::Accuracy, 5),
            ],
        };
        rows.to_vec()
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tidus => write!(f, "Tidus"),
            Self::Yuna => write!(f, "Yuna"),
            Self::Auron => write!(f, "Auron"),
            Self::Kimahri => write!(f, "Kimahri"),
            Self::Wakka => write!(f, "Wakka"),
            Self::Lulu => write!(f, "Lulu"),
            Self::Rikku => write!(f, "Rikku"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for &c in Character::all() {
            assert_eq!(Character::parse(&c.to_string()), Some(c));
        }
        assert_eq!(Character::parse("seymour"), None);
    }

    #[test]
    fn initials_are_unique() {
        for &c in Character::all() {
            let initial = c.to_string().chars().next().unwrap();
            assert_eq!(Character::from_initial(initial), Some(c));
        }
        assert_eq!(Character::from_initial('x'), None);
    }

    #[test]
    fn base_stats_cover_all_stats() {
        for &c in Character::all() {
            let stats = c.base_stats();
            assert_eq!(stats.len(), 10, "{c}");
        }
    }
}
