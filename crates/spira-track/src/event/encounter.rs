//! Encounter events: fielding monsters and rolling the opening condition.

use spira_data::{AutoAbility, DataLibrary, Stat};

use crate::actor::ActorState;
use crate::error::{TrackError, TrackResult};
use crate::formulas::{self, EncounterCondition};
use crate::state::GameState;

use super::{variance_stream, Event, EventKind, STREAM_ENCOUNTER};

/// Roll the opening condition. The draw always happens; a forced condition
/// overrides the result but never skips the roll.
fn roll_condition(
    state: &mut GameState,
    forced: Option<EncounterCondition>,
) -> EncounterCondition {
    let initiative = state
        .party
        .iter()
        .filter_map(|c| state.characters.get(c))
        .any(|a| a.weapon.as_ref().is_some_and(|w| w.has(AutoAbility::Initiative)));
    let roll = state.advance_rng(STREAM_ENCOUNTER);
    let rolled = formulas::encounter_condition_roll(roll, initiative);
    forced.unwrap_or(rolled)
}

/// Seat everyone's initial CTB. Normal openings draw one variance value per
/// party character from their slot stream; the favored side otherwise
/// starts at zero.
fn seat_combatants(state: &mut GameState, condition: EncounterCondition) {
    let party = state.party.clone();
    match condition {
        EncounterCondition::Normal => {
            for c in party {
                let Some(slot) = state.party_slot(c) else { continue };
                let roll = state.advance_rng(variance_stream(slot));
                if let Some(actor) = state.characters.get_mut(&c) {
                    let speed = formulas::tick_speed(actor.stat(Stat::Agility));
                    actor.ctb = formulas::initial_ctb(speed, roll);
                }
            }
            for monster in &mut state.monster_party {
                monster.ctb = formulas::tick_speed(monster.stat(Stat::Agility)) * 3;
            }
        }
        EncounterCondition::Preemptive => {
            for c in party {
                if let Some(actor) = state.characters.get_mut(&c) {
                    actor.ctb = 0;
                }
            }
            for monster in &mut state.monster_party {
                monster.ctb = formulas::tick_speed(monster.stat(Stat::Agility)) * 3;
            }
        }
        EncounterCondition::Ambush => {
            for c in party {
                if let Some(actor) = state.characters.get_mut(&c) {
                    actor.ctb = formulas::tick_speed(actor.stat(Stat::Agility)) * 3;
                }
            }
            for monster in &mut state.monster_party {
                monster.ctb = 0;
            }
        }
    }
    state.normalize_ctb();
}

fn spawn(
    state: &mut GameState,
    library: &DataLibrary,
    monster_names: &[String],
) -> TrackResult<()> {
    let mut fielded = Vec::with_capacity(monster_names.len());
    for (index, name) in monster_names.iter().enumerate() {
        let monster = library.monster(name)?;
        fielded.push(ActorState::monster(monster, index));
    }
    state.process_end_of_encounter();
    state.monster_party = fielded;
    Ok(())
}

impl Event {
    /// A scripted encounter against named monsters, optionally with a
    /// forced opening condition.
    pub fn encounter(
        state: &mut GameState,
        library: &DataLibrary,
        monster_names: &[String],
        forced: Option<EncounterCondition>,
    ) -> TrackResult<Self> {
        let before = state.snapshot();
        spawn(state, library, monster_names)?;
        let condition = roll_condition(state, forced);
        seat_combatants(state, condition);
        state.encounters_count += 1;

        let fielded: Vec<String> = state.monster_party.iter().map(ActorState::name).collect();
        let lines = vec![format!("Encounter ({condition}): {}", fielded.join(", "))];
        Ok(Self::applied(
            EventKind::Encounter { monsters: fielded, condition, forced },
            before,
            lines,
        ))
    }

    /// A random encounter in one zone. The fielded monster rotates through
    /// the zone's table with the zone's encounter counter.
    pub fn random_encounter(
        state: &mut GameState,
        library: &DataLibrary,
        zone: &str,
    ) -> TrackResult<Self> {
        let before = state.snapshot();
        let name = pick_zone_monster(state, library, zone)?;
        spawn(state, library, std::slice::from_ref(&name))?;
        let condition = roll_condition(state, None);
        seat_combatants(state, condition);
        state.encounters_count += 1;
        state.random_encounters_count += 1;
        *state.zone_encounters_counts.entry(zone.to_string()).or_insert(0) += 1;

        let lines = vec![format!("Random encounter in {zone} ({condition}): {name}")];
        Ok(Self::applied(
            EventKind::RandomEncounter { zone: zone.to_string(), monster: name, condition },
            before,
            lines,
        ))
    }

    /// An encounter consumed for its draws only. The condition roll and the
    /// party's variance draws happen; nothing is fielded.
    pub fn simulated_encounter(state: &mut GameState) -> Self {
        let before = state.snapshot();
        state.process_end_of_encounter();
        let condition = roll_condition(state, None);
        seat_combatants(state, condition);
        state.encounters_count += 1;

        let lines = vec![format!("Simulated encounter ({condition})")];
        Self::applied(EventKind::SimulatedEncounter { condition }, before, lines)
    }

    /// A random encounter charged against several zones' counters at once.
    pub fn multizone_random_encounter(
        state: &mut GameState,
        library: &DataLibrary,
        zones: &[String],
    ) -> TrackResult<Self> {
        let Some(first) = zones.first() else {
            return Err(TrackError::EventParsing("multizone needs at least one zone".into()));
        };
        let before = state.snapshot();
        let name = pick_zone_monster(state, library, first)?;
        spawn(state, library, std::slice::from_ref(&name))?;
        let condition = roll_condition(state, None);
        seat_combatants(state, condition);
        state.encounters_count += 1;
        state.random_encounters_count += 1;
        for zone in zones {
            *state.zone_encounters_counts.entry(zone.clone()).or_insert(0) += 1;
        }

        let lines =
            vec![format!("Random encounter in {} ({condition}): {name}", zones.join("+"))];
        Ok(Self::applied(
            EventKind::MultizoneRandomEncounter { zones: zones.to_vec(), monster: name, condition },
            before,
            lines,
        ))
    }
}

fn pick_zone_monster(
    state: &GameState,
    library: &DataLibrary,
    zone: &str,
) -> TrackResult<String> {
    let table = library.monsters_in_zone(zone);
    if table.is_empty() {
        return Err(TrackError::EventParsing(format!("no monsters known in zone {zone}")));
    }
    let seen = state.zone_encounters_counts.get(zone).copied().unwrap_or(0) as usize;
    Ok(table[seen % table.len()].name.clone())
}
