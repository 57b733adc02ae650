//! The line-command DSL.
//!
//! One whitespace-delimited line maps to one command. Parsing never panics
//! and never mutates anything; a bad line surfaces as an error the session
//! turns into an inert diagnostic.

use spira_data::{AutoAbility, Character, EquipmentKind, Stat};
use spira_rng::STREAM_COUNT;

use crate::error::{TrackError, TrackResult};
use crate::formulas::EncounterCondition;

/// Most draws a single `roll` command may burn.
pub const MAX_MANUAL_DRAWS: usize = 100_000;

/// A parsed command, ready to be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A comment or blank line.
    Comment(String),
    /// `kill <monster> <killer> [overkill|ok|<damage>]`
    Kill {
        /// Monster name.
        monster: String,
        /// Killing character.
        killer: Character,
        /// Overkill flag, forced regardless of damage.
        overkill: bool,
        /// Killing-blow damage, checked against the overkill threshold.
        damage: Option<u32>,
    },
    /// `steal <monster> [successful_steals]`
    Steal {
        /// Monster name.
        monster: String,
        /// Prior successful steals against it.
        successful_steals: u32,
    },
    /// `bribe <monster> <user>`
    Bribe {
        /// Monster name.
        monster: String,
        /// Paying character.
        briber: Character,
    },
    /// `party <initials>`
    Party(Vec<Character>),
    /// `roll|waste|advance <rng#> [times]`
    AdvanceRng {
        /// Stream index.
        stream: usize,
        /// Number of draws.
        times: usize,
    },
    /// `death [character]`
    Death(Option<Character>),
    /// `equip <character> <weapon|armor> <slots> [ability...]`
    Equip {
        /// Wearer.
        character: Character,
        /// Weapon or armor.
        kind: EquipmentKind,
        /// Slot count.
        slots: u32,
        /// Abilities to fill in.
        abilities: Vec<AutoAbility>,
    },
    /// `escape <character>`
    Escape(Character),
    /// `encounter boss <monster...> [normal|preemptive|ambush]`
    Encounter {
        /// Monsters to field.
        monsters: Vec<String>,
        /// Forced opening condition.
        forced: Option<EncounterCondition>,
    },
    /// `encounter zone <zone>`
    RandomEncounter {
        /// Zone name.
        zone: String,
    },
    /// `encounter simulation`
    SimulatedEncounter,
    /// `encounter multizone <zone...>`
    MultizoneRandomEncounter {
        /// Zones charged.
        zones: Vec<String>,
    },
    /// `yojimbo <monster> <gil>`
    Yojimbo {
        /// Target monster.
        monster: String,
        /// Gil offered.
        gil: u32,
    },
    /// `stat <character|monster#> <stat> <value>`
    ChangeStat {
        /// Character name or monster battle index.
        target: String,
        /// Stat to set.
        stat: Stat,
        /// New value.
        value: u32,
    },
    /// `<character> <action> [target]`
    Action {
        /// Acting character.
        actor: Character,
        /// Action name.
        action: String,
        /// Optional explicit target.
        target: Option<String>,
    },
    /// `monster <index|name> [action] [target]`
    MonsterAction {
        /// Battle slot or fielded monster name.
        monster: String,
        /// Action name; the monster's first scripted action when omitted.
        action: Option<String>,
        /// Optional explicit character target.
        target: Option<Character>,
    },
}

fn bad(message: impl Into<String>) -> TrackError {
    TrackError::EventParsing(message.into())
}

fn character(token: &str) -> TrackResult<Character> {
    Character::parse(token).ok_or_else(|| bad(format!("unknown character: {token}")))
}

fn number<T: std::str::FromStr>(token: &str, what: &str) -> TrackResult<T> {
    token.parse().map_err(|_| bad(format!("{what} must be a number, got {token}")))
}

fn condition(token: &str) -> Option<EncounterCondition> {
    match token.to_lowercase().as_str() {
        "normal" => Some(EncounterCondition::Normal),
        "preemptive" | "pre" => Some(EncounterCondition::Preemptive),
        "ambush" => Some(EncounterCondition::Ambush),
        _ => None,
    }
}

/// Parse one script line.
pub fn parse(line: &str) -> TrackResult<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Comment(String::new()));
    }
    if let Some(rest) = trimmed.strip_prefix('#') {
        return Ok(Command::Comment(rest.trim().to_string()));
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let head = tokens[0].to_lowercase();
    let args = &tokens[1..];

    match head.as_str() {
        "kill" => {
            let [monster, killer, rest @ ..] = args else {
                return Err(bad("kill needs a monster and a killer"));
            };
            let (overkill, damage) = match rest {
                [] => (false, None),
                [flag] if matches!(*flag, "overkill" | "ok") => (true, None),
                [blow] => (false, Some(number(blow, "killing-blow damage")?)),
                _ => return Err(bad("kill takes at most an overkill flag or a damage value")),
            };
            Ok(Command::Kill {
                monster: (*monster).to_string(),
                killer: character(killer)?,
                overkill,
                damage,
            })
        }
        "steal" => {
            let [monster, rest @ ..] = args else {
                return Err(bad("steal needs a monster"));
            };
            let successful_steals = match rest {
                [] => 0,
                [n] => number(n, "successful_steals")?,
                _ => return Err(bad("steal takes at most a steal counter")),
            };
            Ok(Command::Steal { monster: (*monster).to_string(), successful_steals })
        }
        "bribe" => {
            let [monster, briber] = args else {
                return Err(bad("bribe needs a monster and a user"));
            };
            Ok(Command::Bribe { monster: (*monster).to_string(), briber: character(briber)? })
        }
        "party" => {
            let [initials] = args else {
                return Err(bad("party needs one block of initials"));
            };
            let mut party = Vec::new();
            for c in initials.chars() {
                let member = Character::from_initial(c)
                    .ok_or_else(|| bad(format!("unknown character initial: {c}")))?;
                if !party.contains(&member) {
                    party.push(member);
                }
            }
            Ok(Command::Party(party))
        }
        "roll" | "waste" | "advance" => {
            let (stream_token, times_token) = match args {
                [s] => (*s, "1"),
                [s, t] => (*s, *t),
                _ => return Err(bad("roll needs a stream index and an optional count")),
            };
            let stream: usize =
                number(stream_token.trim_start_matches("rng"), "stream index")?;
            if stream >= STREAM_COUNT {
                return Err(bad(format!("stream index {stream} out of range (0..{STREAM_COUNT})")));
            }
            let times: usize = number(times_token, "times")?;
            if times > MAX_MANUAL_DRAWS {
                return Err(bad(format!("refusing to burn more than {MAX_MANUAL_DRAWS} draws")));
            }
            Ok(Command::AdvanceRng { stream, times })
        }
        "death" => match args {
            [] => Ok(Command::Death(None)),
            [who] => Ok(Command::Death(Some(character(who)?))),
            _ => Err(bad("death takes at most a character")),
        },
        "equip" => {
            let [who, kind, slots, abilities @ ..] = args else {
                return Err(bad("equip needs a character, a kind, and a slot count"));
            };
            let kind = match kind.to_lowercase().as_str() {
                "weapon" => EquipmentKind::Weapon,
                "armor" => EquipmentKind::Armor,
                other => return Err(bad(format!("equipment kind must be weapon or armor, got {other}"))),
            };
            let mut parsed = Vec::new();
            for token in abilities {
                let ability = AutoAbility::parse(token)
                    .ok_or_else(|| bad(format!("unknown autoability: {token}")))?;
                parsed.push(ability);
            }
            Ok(Command::Equip {
                character: character(who)?,
                kind,
                slots: number(slots, "slots")?,
                abilities: parsed,
            })
        }
        "escape" => {
            let [who] = args else {
                return Err(bad("escape needs a character"));
            };
            Ok(Command::Escape(character(who)?))
        }
        "encounter" => {
            let [mode, rest @ ..] = args else {
                return Err(bad("encounter needs a mode"));
            };
            match mode.to_lowercase().as_str() {
                "boss" => {
                    let (forced, monsters) = match rest {
                        [head @ .., last] if condition(last).is_some() => {
                            (condition(last), head)
                        }
                        _ => (None, rest),
                    };
                    if monsters.is_empty() {
                        return Err(bad("encounter boss needs at least one monster"));
                    }
                    Ok(Command::Encounter {
                        monsters: monsters.iter().map(|m| (*m).to_string()).collect(),
                        forced,
                    })
                }
                "zone" => {
                    let [zone] = rest else {
                        return Err(bad("encounter zone needs exactly one zone"));
                    };
                    Ok(Command::RandomEncounter { zone: (*zone).to_string() })
                }
                "simulation" => Ok(Command::SimulatedEncounter),
                "multizone" => {
                    if rest.is_empty() {
                        return Err(bad("encounter multizone needs at least one zone"));
                    }
                    Ok(Command::MultizoneRandomEncounter {
                        zones: rest.iter().map(|z| (*z).to_string()).collect(),
                    })
                }
                other => Err(bad(format!("unknown encounter mode: {other}"))),
            }
        }
        "yojimbo" => {
            let [monster, gil] = args else {
                return Err(bad("yojimbo needs a monster and a gil offer"));
            };
            Ok(Command::Yojimbo {
                monster: (*monster).to_string(),
                gil: number(gil, "gil")?,
            })
        }
        "monster" => {
            let [who, rest @ ..] = args else {
                return Err(bad("monster needs a battle slot or a fielded name"));
            };
            let (action, target) = match rest {
                [] => (None, None),
                [action] => (Some((*action).to_string()), None),
                [action, target] => (Some((*action).to_string()), Some(character(target)?)),
                _ => return Err(bad("monster takes at most an action and a target")),
            };
            Ok(Command::MonsterAction { monster: (*who).to_string(), action, target })
        }
        "stat" => {
            let [target, stat, value] = args else {
                return Err(bad("stat needs a target, a stat, and a value"));
            };
            let stat = Stat::parse(stat)
                .ok_or_else(|| bad(format!("unknown stat: {stat}")))?;
            Ok(Command::ChangeStat {
                target: (*target).to_string(),
                stat,
                value: number(value, "value")?,
            })
        }
        _ => {
            // Any other head is a character taking an action.
            let actor = Character::parse(&head)
                .ok_or_else(|| bad(format!("unknown command or character: {}", tokens[0])))?;
            let [action, rest @ ..] = args else {
                return Err(bad(format!("{actor} needs an action")));
            };
            let target = match rest {
                [] => None,
                [t] => Some((*t).to_string()),
                _ => return Err(bad("actions take at most one target")),
            };
            Ok(Command::Action { actor, action: (*action).to_string(), target })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blanks() {
        assert_eq!(parse(""), Ok(Command::Comment(String::new())));
        assert_eq!(parse("# route start"), Ok(Command::Comment("route start".into())));
    }

    #[test]
    fn kill_with_overkill_flag() {
        assert_eq!(
            parse("kill klikk tidus ok"),
            Ok(Command::Kill {
                monster: "klikk".into(),
                killer: Character::Tidus,
                overkill: true,
                damage: None,
            })
        );
        assert_eq!(
            parse("kill klikk auron"),
            Ok(Command::Kill {
                monster: "klikk".into(),
                killer: Character::Auron,
                overkill: false,
                damage: None,
            })
        );
    }

    #[test]
    fn kill_with_killing_blow_damage() {
        assert_eq!(
            parse("kill klikk tidus 2250"),
            Ok(Command::Kill {
                monster: "klikk".into(),
                killer: Character::Tidus,
                overkill: false,
                damage: Some(2250),
            })
        );
        assert!(parse("kill klikk tidus maybe").is_err());
    }

    #[test]
    fn monster_turn_command() {
        assert_eq!(
            parse("monster 0 attack tidus"),
            Ok(Command::MonsterAction {
                monster: "0".into(),
                action: Some("attack".into()),
                target: Some(Character::Tidus),
            })
        );
        assert_eq!(
            parse("monster klikk"),
            Ok(Command::MonsterAction { monster: "klikk".into(), action: None, target: None })
        );
        assert!(parse("monster").is_err());
        assert!(parse("monster 0 attack gatta").is_err());
    }

    #[test]
    fn party_initials_dedup_preserving_order() {
        assert_eq!(
            parse("party tyakwl"),
            Ok(Command::Party(vec![
                Character::Tidus,
                Character::Yuna,
                Character::Auron,
                Character::Kimahri,
                Character::Wakka,
                Character::Lulu,
            ]))
        );
        assert_eq!(
            parse("party tt"),
            Ok(Command::Party(vec![Character::Tidus]))
        );
        assert!(parse("party txy").is_err());
    }

    #[test]
    fn roll_bounds() {
        assert_eq!(parse("roll 12 40"), Ok(Command::AdvanceRng { stream: 12, times: 40 }));
        assert_eq!(parse("waste rng10 3"), Ok(Command::AdvanceRng { stream: 10, times: 3 }));
        assert_eq!(parse("advance 5"), Ok(Command::AdvanceRng { stream: 5, times: 1 }));
        assert!(parse("roll 68 1").is_err());
        assert!(parse("roll 5 100001").is_err());
    }

    #[test]
    fn encounter_modes() {
        assert_eq!(
            parse("encounter boss klikk ambush"),
            Ok(Command::Encounter {
                monsters: vec!["klikk".into()],
                forced: Some(EncounterCondition::Ambush),
            })
        );
        assert_eq!(
            parse("encounter zone besaid"),
            Ok(Command::RandomEncounter { zone: "besaid".into() })
        );
        assert_eq!(parse("encounter simulation"), Ok(Command::SimulatedEncounter));
        assert_eq!(
            parse("encounter multizone besaid mi'ihen"),
            Ok(Command::MultizoneRandomEncounter {
                zones: vec!["besaid".into(), "mi'ihen".into()],
            })
        );
        assert!(parse("encounter warp").is_err());
    }

    #[test]
    fn character_action_fallback() {
        assert_eq!(
            parse("tidus attack klikk"),
            Ok(Command::Action {
                actor: Character::Tidus,
                action: "attack".into(),
                target: Some("klikk".into()),
            })
        );
        assert_eq!(
            parse("lulu fire"),
            Ok(Command::Action { actor: Character::Lulu, action: "fire".into(), target: None })
        );
        assert!(parse("gatta attack").is_err());
    }

    #[test]
    fn equip_parses_abilities() {
        let parsed = parse("equip tidus weapon 2 piercing firestrike").unwrap();
        match parsed {
            Command::Equip { character, kind, slots, abilities } => {
                assert_eq!(character, Character::Tidus);
                assert_eq!(kind, EquipmentKind::Weapon);
                assert_eq!(slots, 2);
                assert_eq!(abilities, vec![AutoAbility::Piercing, AutoAbility::Firestrike]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stat_command() {
        assert_eq!(
            parse("stat tidus str 50"),
            Ok(Command::ChangeStat { target: "tidus".into(), stat: Stat::Strength, value: 50 })
        );
        assert!(parse("stat tidus charm 50").is_err());
    }
}
