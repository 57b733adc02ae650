//! Mutable simulation state.
//!
//! [`GameState`] owns the stream bank plus everything the simulation tracks
//! between events. Only events mutate it; every mutator here exists for an
//! event to call. [`Snapshot`] captures the game-side fields (never the
//! bank) so an event can be rolled back without rewinding any playhead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spira_data::{Character, Item, Status};
use spira_rng::RngStreamBank;

use crate::actor::ActorState;

/// Gil can never exceed this.
pub const GIL_CAP: u32 = 999_999_999;
/// Compatibility is tracked in 0..=255.
pub const COMPATIBILITY_CAP: u32 = 255;

/// A stack of identical items in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// The item.
    pub item: Item,
    /// How many are held.
    pub quantity: u32,
}

/// A lightweight handle to an actor inside the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRef {
    /// A playable character.
    Character(Character),
    /// The monster at this battle index.
    Monster(usize),
}

/// Everything the game-side fields held before an event ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    characters: BTreeMap<Character, ActorState>,
    monster_party: Vec<ActorState>,
    party: Vec<Character>,
    inventory: Vec<ItemStack>,
    gil: u32,
    compatibility: u32,
    encounters_count: u32,
    random_encounters_count: u32,
    zone_encounters_counts: BTreeMap<String, u32>,
    equipment_drops: u32,
}

/// The full simulation state: stream bank plus game-side fields.
#[derive(Debug)]
pub struct GameState {
    bank: RngStreamBank,
    /// All playable characters, whether or not they are in the party.
    pub characters: BTreeMap<Character, ActorState>,
    /// Monsters currently on the field; empty between encounters.
    pub monster_party: Vec<ActorState>,
    /// Active roster, order significant for owner-priority rules.
    pub party: Vec<Character>,
    /// Item stacks, in acquisition order.
    pub inventory: Vec<ItemStack>,
    /// Held gil, clamped to [0, [`GIL_CAP`]].
    pub gil: u32,
    /// Yojimbo compatibility, clamped to [0, 255].
    pub compatibility: u32,
    /// Total encounters so far.
    pub encounters_count: u32,
    /// Random encounters so far.
    pub random_encounters_count: u32,
    /// Encounters per zone.
    pub zone_encounters_counts: BTreeMap<String, u32>,
    /// Running tally of equipment drops, used as a drop index.
    pub equipment_drops: u32,
}

impl GameState {
    /// Fresh state over a seeded bank. The opening roster is Tidus and
    /// Auron, matching the first controllable fight.
    pub fn new(bank: RngStreamBank) -> Self {
        let mut characters = BTreeMap::new();
        for (slot, &c) in Character::all().iter().enumerate() {
            characters.insert(c, ActorState::character(c, slot.min(7)));
        }
        let mut state = Self {
            bank,
            characters,
            monster_party: Vec::new(),
            party: vec![Character::Tidus, Character::Auron],
            inventory: Vec::new(),
            gil: 0,
            compatibility: 128,
            encounters_count: 0,
            random_encounters_count: 0,
            zone_encounters_counts: BTreeMap::new(),
            equipment_drops: 0,
        };
        state.reseat_party_slots();
        state
    }

    /// Consume the next value from a stream.
    pub fn advance_rng(&mut self, index: usize) -> u32 {
        self.bank.advance(index)
    }

    /// Peek at the next value of a stream without consuming it.
    pub fn peek_rng(&mut self, index: usize) -> u32 {
        self.bank.peek(index)
    }

    /// The next `count` values of a stream, without consuming them.
    pub fn upcoming_rng(&mut self, index: usize, count: usize) -> Vec<u32> {
        self.bank.upcoming(index, count)
    }

    /// Rewind every playhead to 0 while keeping the value caches.
    pub fn reset_rng(&mut self) {
        self.bank.reset();
    }

    /// Current playhead position of a stream.
    pub fn rng_position(&self, index: usize) -> usize {
        self.bank.position(index)
    }

    /// The seed the bank was built from.
    pub fn seed(&self) -> u32 {
        self.bank.seed()
    }

    /// Give back the bank, consuming the state. Used when a replay rebuilds
    /// the state but wants to keep the cached stream values.
    pub fn into_bank(self) -> RngStreamBank {
        self.bank
    }

    /// Capture the game-side fields. The bank is deliberately excluded.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            characters: self.characters.clone(),
            monster_party: self.monster_party.clone(),
            party: self.party.clone(),
            inventory: self.inventory.clone(),
            gil: self.gil,
            compatibility: self.compatibility,
            encounters_count: self.encounters_count,
            random_encounters_count: self.random_encounters_count,
            zone_encounters_counts: self.zone_encounters_counts.clone(),
            equipment_drops: self.equipment_drops,
        }
    }

    /// Restore the game-side fields. Playheads stay where they are.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.characters = snapshot.characters;
        self.monster_party = snapshot.monster_party;
        self.party = snapshot.party;
        self.inventory = snapshot.inventory;
        self.gil = snapshot.gil;
        self.compatibility = snapshot.compatibility;
        self.encounters_count = snapshot.encounters_count;
        self.random_encounters_count = snapshot.random_encounters_count;
        self.zone_encounters_counts = snapshot.zone_encounters_counts;
        self.equipment_drops = snapshot.equipment_drops;
    }

    /// Look up an actor.
    pub fn actor(&self, actor: ActorRef) -> Option<&ActorState> {
        match actor {
            ActorRef::Character(c) => self.characters.get(&c),
            ActorRef::Monster(i) => self.monster_party.get(i),
        }
    }

    /// Look up an actor mutably.
    pub fn actor_mut(&mut self, actor: ActorRef) -> Option<&mut ActorState> {
        match actor {
            ActorRef::Character(c) => self.characters.get_mut(&c),
            ActorRef::Monster(i) => self.monster_party.get_mut(i),
        }
    }

    /// The battle slot a party member occupies, if active.
    pub fn party_slot(&self, character: Character) -> Option<usize> {
        self.party.iter().position(|&c| c == character)
    }

    /// Replace the active roster and renumber battle slots.
    pub fn set_party(&mut self, party: Vec<Character>) {
        self.party = party;
        self.reseat_party_slots();
    }

    fn reseat_party_slots(&mut self) {
        for (slot, &c) in self.party.iter().enumerate() {
            if let Some(actor) = self.characters.get_mut(&c) {
                actor.slot = slot.min(7);
            }
        }
    }

    /// Add gil, clamping into [0, [`GIL_CAP`]].
    pub fn add_gil(&mut self, delta: i64) {
        let next = i64::from(self.gil) + delta;
        self.gil = next.clamp(0, i64::from(GIL_CAP)) as u32;
    }

    /// Shift compatibility, clamping into [0, 255].
    pub fn add_compatibility(&mut self, delta: i32) {
        let next = i32::try_from(self.compatibility).unwrap_or(255) + delta;
        self.compatibility = next.clamp(0, COMPATIBILITY_CAP as i32) as u32;
    }

    /// Add items to an existing stack or open a new one. Never fails.
    pub fn add_to_inventory(&mut self, item: Item, quantity: u32) {
        if let Some(stack) = self.inventory.iter_mut().find(|s| s.item == item) {
            stack.quantity = stack.quantity.saturating_add(quantity);
        } else {
            self.inventory.push(ItemStack { item, quantity });
        }
    }

    /// How many of an item are held.
    pub fn item_count(&self, item: Item) -> u32 {
        self.inventory.iter().find(|s| s.item == item).map_or(0, |s| s.quantity)
    }

    /// Start-of-turn upkeep: temporary statuses drop, equipment auto
    /// statuses are re-derived and re-applied.
    pub fn process_start_of_turn(&mut self, actor: ActorRef) {
        let Some(a) = self.actor_mut(actor) else { return };
        let temporary: Vec<Status> =
            a.statuses.keys().copied().filter(|s| s.is_temporary()).collect();
        for s in temporary {
            a.remove_status(s);
        }
        for s in a.auto_statuses() {
            a.add_status(s, 1);
        }
    }

    /// End-of-turn upkeep: poison tick, duration countdowns with Doom
    /// conversion, regen healing, then CTB normalization across the field.
    pub fn process_end_of_turn(&mut self, actor: ActorRef) {
        if let Some(a) = self.actor_mut(actor) {
            if a.has(Status::Poison) && !a.has(Status::Death) {
                let tick = a.max_hp() * a.poison_rate / 100;
                a.take_damage(tick);
            }
            if a.has(Status::Regen) && !a.has(Status::Death) {
                let heal = (a.max_hp() * a.ctb / 256).max(1);
                a.heal(heal);
            }
            let ticking: Vec<Status> =
                a.statuses.keys().copied().filter(|s| s.is_duration_based()).collect();
            for s in ticking {
                let stacks = a.statuses[&s] - 1;
                if stacks == 0 {
                    a.remove_status(s);
                    if s == Status::Doom {
                        a.add_status(Status::Death, 1);
                    }
                } else {
                    a.statuses.insert(s, stacks);
                }
            }
        }
        self.normalize_ctb();
    }

    /// Shift every live combatant's CTB down so the next to act sits at 0.
    pub fn normalize_ctb(&mut self) {
        let minimum = self
            .party
            .iter()
            .filter_map(|c| self.characters.get(c))
            .chain(self.monster_party.iter())
            .filter(|a| !a.is_out())
            .map(|a| a.ctb)
            .min()
            .unwrap_or(0);
        if minimum == 0 {
            return;
        }
        for c in self.party.clone() {
            if let Some(a) = self.characters.get_mut(&c) {
                a.ctb = a.ctb.saturating_sub(minimum);
            }
        }
        for a in &mut self.monster_party {
            a.ctb = a.ctb.saturating_sub(minimum);
        }
    }

    /// End-of-encounter cleanup: the dead stand back up at 1 HP, all
    /// statuses, buffs, and CTB clear, the field empties.
    pub fn process_end_of_encounter(&mut self) {
        for actor in self.characters.values_mut() {
            if actor.has(Status::Death) {
                actor.statuses.remove(&Status::Death);
                actor.current_hp = 1;
            }
            actor.statuses.clear();
            actor.buffs.clear();
            actor.ctb = 0;
        }
        self.monster_party.clear();
    }

    /// Living monsters still on the field.
    pub fn live_monsters(&self) -> Vec<usize> {
        self.monster_party
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_out())
            .map(|(i, _)| i)
            .collect()
    }

    /// Display name of an actor, or a placeholder for a stale reference.
    pub fn actor_name(&self, actor: ActorRef) -> String {
        self.actor(actor).map_or_else(|| "?".to_string(), ActorState::name)
    }
}
