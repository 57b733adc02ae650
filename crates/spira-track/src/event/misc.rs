//! Bookkeeping events: manual draws, roster, stat, and equipment changes.

use spira_data::{Character, Equipment, Stat};

use crate::error::{TrackError, TrackResult};
use crate::state::{ActorRef, GameState};

use super::{Event, EventKind};

impl Event {
    /// Burn `times` draws from one stream. Mutates nothing else.
    pub fn advance_rng(state: &mut GameState, stream: usize, times: usize) -> Self {
        let before = state.snapshot();
        for _ in 0..times {
            state.advance_rng(stream);
        }
        let lines = vec![format!("Advance rng{stream} x{times}")];
        Self::applied(EventKind::AdvanceRng { stream, times }, before, lines)
    }

    /// Replace the active roster. Order is significant: it sets battle
    /// slots and the owner-priority walk for equipment drops.
    pub fn change_party(state: &mut GameState, party: Vec<Character>) -> Self {
        let before = state.snapshot();
        state.set_party(party.clone());
        let initials: String = party.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ");
        let lines = vec![format!("Party: {initials}")];
        Self::applied(EventKind::ChangeParty { party }, before, lines)
    }

    /// Override one stat on a character or a fielded monster. The value
    /// clamps to the stat's hard cap; current HP/MP re-clamp to the new
    /// maximum.
    pub fn change_stat(
        state: &mut GameState,
        actor: ActorRef,
        stat: Stat,
        value: u32,
    ) -> TrackResult<Self> {
        let before = state.snapshot();
        let name = state.actor_name(actor);
        let Some(target) = state.actor_mut(actor) else {
            return Err(TrackError::EventParsing("no such actor for stat change".to_string()));
        };
        let value = value.min(stat.cap());
        target.stats.insert(stat, value);
        target.current_hp = target.current_hp.min(target.max_hp());
        target.current_mp = target.current_mp.min(target.max_mp());
        if stat == Stat::Hp && target.current_hp == 0 {
            target.set_hp(0);
        }
        let lines = vec![format!("{name}: {stat} = {value}")];
        Ok(Self::applied(EventKind::ChangeStat { actor: name, stat, value }, before, lines))
    }

    /// Put a piece of equipment on a character.
    pub fn change_equipment(state: &mut GameState, equipment: Equipment) -> TrackResult<Self> {
        let character = equipment.owner;
        let name = equipment.name();
        let before = state.snapshot();
        let Some(actor) = state.characters.get_mut(&character) else {
            return Err(TrackError::EventParsing(format!("unknown character {character}")));
        };
        actor.equip(equipment);
        let lines = vec![format!("{character} equips {name}")];
        Ok(Self::applied(EventKind::ChangeEquipment { character, name }, before, lines))
    }
}
