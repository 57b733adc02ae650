//! The session: a seeded bank, a state, and an ordered event log.

use spira_data::{Character, DataLibrary, Equipment};
use spira_rng::RngStreamBank;

use crate::error::TrackResult;
use crate::event::Event;
use crate::parser::{self, Command};
use crate::state::{ActorRef, GameState};

/// A full tracking session. Commands append events; editing the script
/// means replaying it from the top against rewound playheads.
#[derive(Debug)]
pub struct Tracker {
    state: GameState,
    library: DataLibrary,
    events: Vec<Event>,
    script: Vec<String>,
}

impl Tracker {
    /// A session over a direct seed with the built-in tables.
    pub fn new(seed: u32) -> Self {
        Self::with_library(RngStreamBank::new(seed), DataLibrary::builtin())
    }

    /// A session over a prepared bank and data library.
    pub fn with_library(bank: RngStreamBank, library: DataLibrary) -> Self {
        Self { state: GameState::new(bank), library, events: Vec::new(), script: Vec::new() }
    }

    /// Current simulation state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for direct inspection tooling.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The data library the session resolves names against.
    pub fn library(&self) -> &DataLibrary {
        &self.library
    }

    /// The applied events, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The raw script lines fed so far.
    pub fn script(&self) -> &[String] {
        &self.script
    }

    /// Run one script line. A line that fails to parse or resolve becomes
    /// an inert diagnostic comment; the session never aborts on bad input.
    pub fn execute_line(&mut self, line: &str) -> &Event {
        self.script.push(line.to_string());
        let event = match parser::parse(line) {
            Ok(command) => match self.run(command) {
                Ok(event) => event,
                Err(err) => Event::comment(&self.state, format!("! {err}")),
            },
            Err(err) => Event::comment(&self.state, format!("! {err}")),
        };
        self.events.push(event);
        self.events.last().expect("just pushed")
    }

    fn run(&mut self, command: Command) -> TrackResult<Event> {
        let state = &mut self.state;
        let library = &self.library;
        match command {
            Command::Comment(text) => Ok(Event::comment(state, text)),
            Command::Kill { monster, killer, overkill, damage } => {
                Event::kill(state, library, &monster, killer, overkill, damage)
            }
            Command::Steal { monster, successful_steals } => {
                Event::steal(state, library, &monster, successful_steals)
            }
            Command::Bribe { monster, briber } => Event::bribe(state, library, &monster, briber),
            Command::Party(party) => Ok(Event::change_party(state, party)),
            Command::AdvanceRng { stream, times } => {
                Ok(Event::advance_rng(state, stream, times))
            }
            Command::Death(character) => Ok(Event::death(state, character)),
            Command::Equip { character, kind, slots, abilities } => {
                let piece = Equipment::new(
                    character,
                    kind,
                    slots,
                    abilities,
                    Equipment::STANDARD_BASE_DAMAGE,
                    Equipment::STANDARD_BONUS_CRIT,
                );
                Event::change_equipment(state, piece)
            }
            Command::Escape(character) => Event::escape(state, character),
            Command::Encounter { monsters, forced } => {
                Event::encounter(state, library, &monsters, forced)
            }
            Command::RandomEncounter { zone } => Event::random_encounter(state, library, &zone),
            Command::SimulatedEncounter => Ok(Event::simulated_encounter(state)),
            Command::MultizoneRandomEncounter { zones } => {
                Event::multizone_random_encounter(state, library, &zones)
            }
            Command::Yojimbo { monster, gil } => Event::yojimbo_turn(state, library, &monster, gil),
            Command::ChangeStat { target, stat, value } => {
                let actor = match Character::parse(&target) {
                    Some(c) => ActorRef::Character(c),
                    None => ActorRef::Monster(
                        target.parse().map_err(|_| {
                            crate::error::TrackError::EventParsing(format!(
                                "stat target must be a character or battle index, got {target}"
                            ))
                        })?,
                    ),
                };
                Event::change_stat(state, actor, stat, value)
            }
            Command::Action { actor, action, target } => {
                Event::character_action(state, library, actor, &action, target.as_deref())
            }
            Command::MonsterAction { monster, action, target } => {
                Event::monster_action(state, library, &monster, action.as_deref(), target)
            }
        }
    }

    /// Replay the whole recorded script from scratch: playheads rewind to
    /// 0 (caches stay), state resets, every event reconstructs in order.
    pub fn replay(&mut self) {
        let script = std::mem::take(&mut self.script);
        self.replay_script(script);
    }

    /// Replace the script and replay it from the top.
    pub fn replay_script(&mut self, script: Vec<String>) {
        let placeholder = GameState::new(RngStreamBank::new(0));
        let mut bank = std::mem::replace(&mut self.state, placeholder).into_bank();
        bank.reset();
        self.state = GameState::new(bank);
        self.events.clear();
        self.script.clear();
        for line in script {
            self.execute_line(&line);
        }
    }

    /// Undo the most recent event's state mutation. Playheads stay put; a
    /// replay is the only way to rewind them.
    pub fn rollback_last(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.script.pop();
        event.rollback(&mut self.state);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spira_data::Item;

    #[test]
    fn bad_lines_become_diagnostics() {
        let mut tracker = Tracker::new(42);
        let before = tracker.state().snapshot();
        let event = tracker.execute_line("frobnicate the widget");
        assert!(event.to_string().starts_with("# !"));
        assert_eq!(tracker.state().snapshot(), before);
        assert_eq!(tracker.events().len(), 1);
    }

    #[test]
    fn steal_through_the_script_layer() {
        let mut tracker = Tracker::new(42);
        tracker.execute_line("steal sinscale");
        assert!(tracker.state().inventory.iter().any(|s| s.item == Item::Potion));
    }

    #[test]
    fn replay_is_deterministic() {
        let script = [
            "party ta",
            "encounter boss klikk normal",
            "tidus attack klikk",
            "auron power_break klikk",
            "kill klikk tidus",
            "roll 12 5",
        ];
        let mut a = Tracker::new(0xDEAD_BEEF);
        for line in script {
            a.execute_line(line);
        }
        let first: Vec<String> = a.events().iter().map(Event::to_string).collect();
        let gil_first = a.state().gil;

        a.replay();
        let second: Vec<String> = a.events().iter().map(Event::to_string).collect();
        assert_eq!(first, second);
        assert_eq!(a.state().gil, gil_first);

        // A second session over the same seed agrees line for line.
        let mut b = Tracker::new(0xDEAD_BEEF);
        for line in script {
            b.execute_line(line);
        }
        let third: Vec<String> = b.events().iter().map(Event::to_string).collect();
        assert_eq!(first, third);
    }

    #[test]
    fn rollback_undoes_state_not_playheads() {
        let mut tracker = Tracker::new(9);
        tracker.execute_line("steal sinscale");
        let snapshot = tracker.state().snapshot();
        let position = tracker.state().rng_position(10);
        tracker.execute_line("steal sinscale");
        tracker.rollback_last();
        assert_eq!(tracker.state().snapshot(), snapshot);
        assert!(tracker.state().rng_position(10) > position);
    }

    #[test]
    fn rollback_on_empty_log_is_none() {
        let mut tracker = Tracker::new(1);
        assert!(tracker.rollback_last().is_none());
    }
}
