//! Battle-turn events: character and monster actions, escapes, Yojimbo.

use spira_data::{
    Action, Affinity, Buff, Character, DamageKind, DataLibrary, Stat, Status, StatusApplication,
    TargetMode,
};

use crate::actor::ActorId;
use crate::error::{TrackError, TrackResult};
use crate::formulas::{self, DamageShape};
use crate::state::{ActorRef, GameState};

use super::{
    describe_hit, status_stream, target_stream, variance_stream, Event, EventKind, HitOutcome,
    STREAM_YOJIMBO,
};

/// Resolve one hit of an action against one target, drawing in order:
/// hit check, crit check, damage roll (all from the attacker's slot
/// stream), then one status roll per attempted status from the slot's
/// status stream. Haste and Slow each burn one extra status draw; a landed
/// Petrify draws a shatter follow-up.
fn resolve_strike(
    state: &mut GameState,
    attacker: ActorRef,
    defender: ActorRef,
    action: &Action,
) -> HitOutcome {
    let stale = HitOutcome {
        target: "?".to_string(),
        hit: false,
        crit: false,
        damage: 0,
        healed: false,
        statuses: Vec::new(),
    };
    let (Some(a), Some(d)) = (state.actor(attacker).cloned(), state.actor(defender).cloned())
    else {
        return stale;
    };
    let stream = variance_stream(a.slot);

    let mut outcome = HitOutcome { target: d.name(), hit: true, ..stale };

    // Against zero evasion with clear eyes the engine skips the hit roll.
    let darkened = a.has(Status::Darkness);
    if action.can_miss && (d.stat(Stat::Evasion) > 0 || darkened) {
        let roll = state.advance_rng(stream);
        let threshold = formulas::hit_threshold(
            a.stat(Stat::Accuracy),
            d.stat(Stat::Evasion),
            a.buff(Buff::Aim),
            d.buff(Buff::Reflex),
            darkened,
        );
        if !formulas::hit_lands(roll, threshold) {
            outcome.hit = false;
            return outcome;
        }
    }

    if action.can_crit {
        let roll = state.advance_rng(stream);
        let threshold =
            formulas::crit_threshold(a.stat(Stat::Luck), d.stat(Stat::Luck), a.bonus_crit());
        outcome.crit = formulas::crit_lands(roll, threshold);
    }

    if action.damage != DamageKind::None {
        let variance = state.advance_rng(stream);
        let physical = action.damage == DamageKind::Physical;
        let element = action
            .element
            .or_else(|| if physical { a.strike_elements().first().copied() } else { None });
        let affinity = if action.heals {
            Affinity::Neutral
        } else {
            element.map_or(Affinity::Neutral, |e| d.affinity(e))
        };
        let base = match action.damage {
            DamageKind::Physical => formulas::physical_base(a.stat(Stat::Strength), action.power),
            DamageKind::Magical => formulas::magical_base(a.stat(Stat::Magic), action.power),
            DamageKind::Special => action.power,
            DamageKind::None => 0,
        };
        let shape = DamageShape {
            affinity,
            boosted: physical && action.element.is_none() && element.is_some(),
            shielded: if physical { d.has(Status::Protect) } else { d.has(Status::Shell) },
            defense: if physical { d.stat(Stat::Defense) } else { d.stat(Stat::MagicDefense) },
            defense_broken: if physical {
                d.has(Status::ArmorBreak)
            } else {
                d.has(Status::MentalBreak)
            },
            attacker_broken: if physical {
                a.has(Status::PowerBreak)
            } else {
                a.has(Status::MagicBreak)
            },
            attack_stacks: a.buff(if physical { Buff::Cheer } else { Buff::Focus }),
            guard_stacks: d.buff(if physical { Buff::Cheer } else { Buff::Focus }),
            variance_roll: variance,
            crit: outcome.crit,
            armored: d.armored,
            piercing: a.piercing(),
            break_damage_limit: a.breaks_damage_limit(),
        };
        outcome.damage = formulas::resolve_damage(base, &shape);
        outcome.healed = action.heals || affinity == Affinity::Absorb;
        if let Some(target) = state.actor_mut(defender) {
            if outcome.healed {
                target.heal(outcome.damage);
            } else {
                target.take_damage(outcome.damage);
            }
        }
    }

    let mut attempts: Vec<StatusApplication> = action.statuses.clone();
    if action.damage == DamageKind::Physical {
        for (status, chance) in a.touch_statuses() {
            let stacks = if status.is_duration_based() { 3 } else { 1 };
            attempts.push(StatusApplication { status, chance, stacks });
        }
    }
    let s_stream = status_stream(a.slot);
    for attempt in attempts {
        let roll = state.advance_rng(s_stream);
        let resistance =
            state.actor(defender).map_or(255, |t| t.status_resistance(attempt.status));
        let landed = formulas::status_lands(roll, attempt.chance, resistance);
        if landed && let Some(target) = state.actor_mut(defender) {
            target.add_status(attempt.status, attempt.stacks);
        }
        outcome.statuses.push((attempt.status, landed));
        // Haste/Slow applications burn a paired extra draw.
        if matches!(attempt.status, Status::Haste | Status::Slow) {
            state.advance_rng(s_stream);
        }
        // A landed Petrify rolls shatter immediately.
        if landed && attempt.status == Status::Petrify {
            let shatter = state.advance_rng(s_stream);
            if (shatter & 255) < 64
                && let Some(target) = state.actor_mut(defender)
            {
                target.remove_status(Status::Petrify);
                target.add_status(Status::Death, 1);
            }
        }
    }

    outcome
}

fn finish_turn(state: &mut GameState, actor: ActorRef, rank: u32) {
    if let Some(a) = state.actor_mut(actor) {
        a.ctb += a.turn_cost(rank);
    }
    state.process_end_of_turn(actor);
}

impl Event {
    /// A party member's turn.
    pub fn character_action(
        state: &mut GameState,
        library: &DataLibrary,
        actor: Character,
        action_name: &str,
        target: Option<&str>,
    ) -> TrackResult<Self> {
        if !state.party.contains(&actor) {
            return Err(TrackError::NotInParty(actor.to_string()));
        }
        if state.characters.get(&actor).is_some_and(|a| !a.can_act()) {
            return Err(TrackError::EventParsing(format!("{actor} cannot act right now")));
        }
        let action = library.action(action_name)?.clone();
        if action.is_magical()
            && state.characters.get(&actor).is_some_and(|a| a.has(Status::Silence))
        {
            return Err(TrackError::EventParsing(format!("{actor} is silenced")));
        }
        let before = state.snapshot();
        let actor_ref = ActorRef::Character(actor);

        state.process_start_of_turn(actor_ref);
        if let Some(a) = state.actor_mut(actor_ref) {
            a.spend_mp(action.mp_cost);
        }

        let mut outcomes = Vec::new();
        if let Some(buff) = action.buff {
            // Buff actions raise the whole active party.
            for c in state.party.clone() {
                if let Some(member) = state.characters.get_mut(&c)
                    && !member.is_out()
                {
                    member.add_buff(buff);
                }
            }
        } else if action.target == TargetMode::RandomEnemy {
            // Each swing of a fury re-picks its victim.
            for _ in 0..action.hits.max(1) {
                let defender = random_enemy(state, Some(actor))?;
                outcomes.push(resolve_strike(state, actor_ref, defender, &action));
            }
        } else {
            let targets = character_targets(state, actor, &action, target)?;
            for defender in targets {
                for _ in 0..action.hits.max(1) {
                    outcomes.push(resolve_strike(state, actor_ref, defender, &action));
                }
            }
        }

        finish_turn(state, actor_ref, action.rank);

        let mut lines = vec![format!("{actor}: {}", action.name)];
        lines.extend(outcomes.iter().map(|o| describe_hit(o, &action.name)));
        Ok(Self::applied(
            EventKind::CharacterAction { actor, action: action.name.clone(), outcomes },
            before,
            lines,
        ))
    }

    /// A monster's turn, addressed by battle slot or fielded name. With no
    /// action named, the monster uses the first action its prize struct
    /// scripts.
    pub fn monster_action(
        state: &mut GameState,
        library: &DataLibrary,
        monster: &str,
        action_name: Option<&str>,
        target: Option<Character>,
    ) -> TrackResult<Self> {
        let index = find_monster(state, monster)?;
        let actor_ref = ActorRef::Monster(index);
        let Some(acting) = state.actor(actor_ref) else {
            return Err(TrackError::NoSuchMonster(index));
        };
        let actor_name = acting.name();
        if !acting.can_act() {
            return Err(TrackError::EventParsing(format!(
                "{actor_name} cannot act right now"
            )));
        }
        let silenced = acting.has(Status::Silence);
        let ActorId::Monster { name: prize_name, .. } = acting.id.clone() else {
            return Err(TrackError::NoSuchMonster(index));
        };
        let action_name = match action_name {
            Some(name) => name.to_string(),
            None => library
                .monster(&prize_name)?
                .actions
                .first()
                .cloned()
                .ok_or_else(|| {
                    TrackError::EventParsing(format!("{actor_name} has no scripted action"))
                })?,
        };
        let action = library.action(&action_name)?.clone();
        if silenced && action.is_magical() {
            return Err(TrackError::EventParsing(format!("{actor_name} is silenced")));
        }
        let before = state.snapshot();

        state.process_start_of_turn(actor_ref);

        let mut outcomes = Vec::new();
        if action.target == TargetMode::RandomEnemy && target.is_none() {
            for _ in 0..action.hits.max(1) {
                let defender = random_party_member(state)?;
                outcomes.push(resolve_strike(state, actor_ref, defender, &action));
            }
        } else {
            let targets = monster_targets(state, &action, target)?;
            for defender in targets {
                for _ in 0..action.hits.max(1) {
                    outcomes.push(resolve_strike(state, actor_ref, defender, &action));
                }
            }
        }

        finish_turn(state, actor_ref, action.rank);

        let mut lines = vec![format!("{actor_name}: {}", action.name)];
        lines.extend(outcomes.iter().map(|o| describe_hit(o, &action.name)));
        Ok(Self::applied(
            EventKind::MonsterAction { actor: actor_name, action: action.name.clone(), outcomes },
            before,
            lines,
        ))
    }

    /// An escape attempt from the named character's slot stream.
    pub fn escape(state: &mut GameState, character: Character) -> TrackResult<Self> {
        let Some(slot) = state.party_slot(character) else {
            return Err(TrackError::NotInParty(character.to_string()));
        };
        let before = state.snapshot();
        let roll = state.advance_rng(variance_stream(slot));
        let success = formulas::escape_lands(roll);
        if success && let Some(a) = state.characters.get_mut(&character) {
            a.add_status(Status::Escaped, 1);
        }
        let line = if success {
            format!("{character} escapes")
        } else {
            format!("{character} fails to escape")
        };
        Ok(Self::applied(EventKind::Escape { character, success }, before, vec![line]))
    }

    /// One Yojimbo turn: motivation from compatibility, a dedicated-stream
    /// roll, and the offered gil, scaled down by the target's resistance
    /// tier; a second roll decides whether the attack comes free.
    pub fn yojimbo_turn(
        state: &mut GameState,
        library: &DataLibrary,
        target_monster: &str,
        gil_offered: u32,
    ) -> TrackResult<Self> {
        let monster = library.monster(target_monster)?.clone();
        let before = state.snapshot();

        let roll = state.advance_rng(STREAM_YOJIMBO);
        let gil_bonus = if gil_offered > 0 { (gil_offered.ilog10() + 1) * 4 } else { 0 };
        let raw = state.compatibility / 4 + roll % 64 + gil_bonus;
        let motivation = raw / (monster.zanmato_level + 1);

        let attack = match motivation {
            0..=15 => "Daigoro",
            16..=31 => "Kozuka",
            32..=47 => "Wakizashi",
            48..=63 => "Wakizashi (all)",
            _ => "Zanmato",
        };

        let free_roll = state.advance_rng(STREAM_YOJIMBO);
        let free = free_roll % 256 < state.compatibility / 4;
        let gil_spent = if free { 0 } else { gil_offered };
        state.add_gil(-i64::from(gil_spent));

        match attack {
            "Zanmato" => state.add_compatibility(4),
            "Daigoro" => state.add_compatibility(-3),
            _ => state.add_compatibility(1),
        }

        if attack == "Zanmato" {
            for m in &mut state.monster_party {
                m.current_hp = 0;
                m.add_status(Status::Death, 1);
            }
        }

        let free_tag = if free { ", free" } else { "" };
        let lines = vec![format!(
            "Yojimbo vs {}: {attack} (motivation {motivation}, {gil_spent} gil{free_tag})",
            monster.name
        )];
        Ok(Self::applied(
            EventKind::YojimboTurn { motivation, attack: attack.to_string(), gil_spent, free },
            before,
            lines,
        ))
    }
}

/// One enemy picked by the acting side's target stream.
fn random_enemy(state: &mut GameState, actor: Option<Character>) -> TrackResult<ActorRef> {
    let live = state.live_monsters();
    if live.is_empty() {
        return Err(TrackError::EventParsing("no monsters on the field".into()));
    }
    let roll = state.advance_rng(target_stream(actor));
    Ok(ActorRef::Monster(live[roll as usize % live.len()]))
}

fn standing_party(state: &GameState) -> Vec<Character> {
    state
        .party
        .iter()
        .copied()
        .filter(|c| state.characters.get(c).is_some_and(|a| !a.is_out()))
        .collect()
}

fn random_party_member(state: &mut GameState) -> TrackResult<ActorRef> {
    let live = standing_party(state);
    if live.is_empty() {
        return Err(TrackError::EventParsing("no standing party members".into()));
    }
    let roll = state.advance_rng(target_stream(None));
    Ok(ActorRef::Character(live[roll as usize % live.len()]))
}

fn character_targets(
    state: &mut GameState,
    actor: Character,
    action: &Action,
    named: Option<&str>,
) -> TrackResult<Vec<ActorRef>> {
    match action.target {
        TargetMode::SelfOnly => Ok(vec![ActorRef::Character(actor)]),
        TargetMode::Ally => {
            let who = match named {
                Some(name) => Character::parse(name).ok_or_else(|| {
                    TrackError::EventParsing(format!("unknown ally: {name}"))
                })?,
                None => actor,
            };
            Ok(vec![ActorRef::Character(who)])
        }
        TargetMode::AllEnemies => {
            Ok(state.live_monsters().into_iter().map(ActorRef::Monster).collect())
        }
        TargetMode::Single | TargetMode::RandomEnemy => {
            if action.target == TargetMode::Single
                && let Some(name) = named
            {
                return find_monster(state, name).map(|i| vec![ActorRef::Monster(i)]);
            }
            Ok(vec![random_enemy(state, Some(actor))?])
        }
    }
}

fn monster_targets(
    state: &mut GameState,
    action: &Action,
    named: Option<Character>,
) -> TrackResult<Vec<ActorRef>> {
    match action.target {
        TargetMode::AllEnemies => {
            let live = standing_party(state);
            if live.is_empty() {
                return Err(TrackError::EventParsing("no standing party members".into()));
            }
            Ok(live.into_iter().map(ActorRef::Character).collect())
        }
        _ => {
            if let Some(c) = named {
                return Ok(vec![ActorRef::Character(c)]);
            }
            Ok(vec![random_party_member(state)?])
        }
    }
}

fn find_monster(state: &GameState, name: &str) -> TrackResult<usize> {
    let wanted = name.to_lowercase().replace([' ', '-'], "_");
    // A bare number addresses a battle slot directly.
    if let Ok(index) = wanted.parse::<usize>() {
        return if index < state.monster_party.len() {
            Ok(index)
        } else {
            Err(TrackError::NoSuchMonster(index))
        };
    }
    state
        .monster_party
        .iter()
        .position(|m| !m.is_out() && m.name().to_lowercase().starts_with(&wanted))
        .ok_or_else(|| TrackError::EventParsing(format!("no {name} on the field")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::EncounterCondition;
    use spira_rng::RngStreamBank;

    fn battle() -> (GameState, DataLibrary) {
        let mut state = GameState::new(RngStreamBank::new(0xC0FFEE));
        let library = DataLibrary::builtin();
        state.set_party(vec![Character::Tidus, Character::Auron]);
        Event::encounter(
            &mut state,
            &library,
            &["klikk".to_string()],
            Some(EncounterCondition::Normal),
        )
        .unwrap();
        (state, library)
    }

    #[test]
    fn attack_damages_the_target() {
        let (mut state, library) = battle();
        let hp_before = state.monster_party[0].current_hp;
        let event =
            Event::character_action(&mut state, &library, Character::Tidus, "attack", Some("klikk"))
                .unwrap();
        if let EventKind::CharacterAction { outcomes, .. } = event.kind() {
            assert_eq!(outcomes.len(), 1);
            assert!(outcomes[0].hit);
            assert_eq!(state.monster_party[0].current_hp, hp_before - outcomes[0].damage);
        } else {
            panic!("wrong kind");
        }
    }

    #[test]
    fn named_target_skips_the_target_draw() {
        let (mut state, library) = battle();
        let before = state.rng_position(target_stream(Some(Character::Tidus)));
        Event::character_action(&mut state, &library, Character::Tidus, "attack", Some("klikk"))
            .unwrap();
        assert_eq!(state.rng_position(target_stream(Some(Character::Tidus))), before);
    }

    #[test]
    fn unnamed_target_draws_from_the_target_stream() {
        let (mut state, library) = battle();
        let before = state.rng_position(target_stream(Some(Character::Tidus)));
        Event::character_action(&mut state, &library, Character::Tidus, "attack", None).unwrap();
        assert_eq!(state.rng_position(target_stream(Some(Character::Tidus))), before + 1);
    }

    #[test]
    fn sleeping_actor_cannot_take_a_turn() {
        let (mut state, library) = battle();
        state
            .characters
            .get_mut(&Character::Tidus)
            .unwrap()
            .add_status(Status::Sleep, 3);
        let err = Event::character_action(&mut state, &library, Character::Tidus, "attack", None)
            .unwrap_err();
        assert!(matches!(err, TrackError::EventParsing(_)));
    }

    #[test]
    fn out_of_party_actor_is_rejected() {
        let (mut state, library) = battle();
        let err =
            Event::character_action(&mut state, &library, Character::Rikku, "attack", None)
                .unwrap_err();
        assert_eq!(err, TrackError::NotInParty("Rikku".into()));
    }

    #[test]
    fn cheer_raises_the_whole_party() {
        let (mut state, library) = battle();
        Event::character_action(&mut state, &library, Character::Tidus, "cheer", None).unwrap();
        assert_eq!(state.characters[&Character::Tidus].buff(Buff::Cheer), 1);
        assert_eq!(state.characters[&Character::Auron].buff(Buff::Cheer), 1);
    }

    #[test]
    fn status_attack_rolls_the_status_stream() {
        let (mut state, library) = battle();
        let slot = state.party_slot(Character::Auron).unwrap();
        let before = state.rng_position(status_stream(slot));
        Event::character_action(
            &mut state,
            &library,
            Character::Auron,
            "power_break",
            Some("klikk"),
        )
        .unwrap();
        assert_eq!(state.rng_position(status_stream(slot)), before + 1);
    }

    #[test]
    fn sleep_immunity_blocks_sleep_attack() {
        let (mut state, library) = battle();
        Event::character_action(
            &mut state,
            &library,
            Character::Tidus,
            "sleep_attack",
            Some("klikk"),
        )
        .unwrap();
        assert!(!state.monster_party[0].has(Status::Sleep));
    }

    #[test]
    fn monster_action_targets_a_character() {
        let (mut state, library) = battle();
        let event =
            Event::monster_action(&mut state, &library, "0", Some("attack"), Some(Character::Tidus))
                .unwrap();
        if let EventKind::MonsterAction { outcomes, .. } = event.kind() {
            assert_eq!(outcomes[0].target, "Tidus");
        } else {
            panic!("wrong kind");
        }
    }

    #[test]
    fn monster_by_name_uses_its_scripted_action() {
        let (mut state, library) = battle();
        let event = Event::monster_action(&mut state, &library, "klikk", None, None).unwrap();
        if let EventKind::MonsterAction { actor, action, .. } = event.kind() {
            assert_eq!(actor, "klikk");
            assert_eq!(action, "attack");
        } else {
            panic!("wrong kind");
        }
        assert!(Event::monster_action(&mut state, &library, "7", None, None).is_err());
    }

    #[test]
    fn silence_blocks_casting_but_not_swinging() {
        let (mut state, library) = battle();
        state
            .characters
            .get_mut(&Character::Tidus)
            .unwrap()
            .add_status(Status::Silence, 3);
        let err = Event::character_action(&mut state, &library, Character::Tidus, "fire", None)
            .unwrap_err();
        assert!(matches!(err, TrackError::EventParsing(_)));
        assert!(
            Event::character_action(&mut state, &library, Character::Tidus, "attack", Some("klikk"))
                .is_ok()
        );
    }

    #[test]
    fn multi_hit_fury_redraws_its_target_each_swing() {
        use spira_data::Element;
        let (mut state, mut library) = battle();
        let mut fury = Action::spell("fury", 10, Element::Fire, 0);
        fury.target = TargetMode::RandomEnemy;
        fury.hits = 3;
        library.insert_action(fury);
        let stream = target_stream(Some(Character::Tidus));
        let before = state.rng_position(stream);
        Event::character_action(&mut state, &library, Character::Tidus, "fury", None).unwrap();
        assert_eq!(state.rng_position(stream), before + 3);
    }

    #[test]
    fn escape_draws_the_slot_stream() {
        let (mut state, _library) = battle();
        let slot = state.party_slot(Character::Tidus).unwrap();
        let before = state.rng_position(variance_stream(slot));
        Event::escape(&mut state, Character::Tidus).unwrap();
        assert_eq!(state.rng_position(variance_stream(slot)), before + 1);
    }

    #[test]
    fn yojimbo_draws_two_dedicated_rolls() {
        let (mut state, library) = battle();
        let before = state.rng_position(STREAM_YOJIMBO);
        Event::yojimbo_turn(&mut state, &library, "klikk", 5_000).unwrap();
        assert_eq!(state.rng_position(STREAM_YOJIMBO), before + 2);
    }

    #[test]
    fn combat_rollback_restores_everything() {
        let (mut state, library) = battle();
        let before = state.snapshot();
        let event =
            Event::character_action(&mut state, &library, Character::Tidus, "attack", Some("klikk"))
                .unwrap();
        event.rollback(&mut state);
        assert_eq!(state.snapshot(), before);
    }
}
