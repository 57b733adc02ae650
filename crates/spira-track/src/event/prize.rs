//! Steal, kill, and bribe events: the prize-table side of the simulation.

use spira_data::{Character, DataLibrary, Equipment, EquipmentDropTable, EquipmentKind, Status};

use crate::error::{TrackError, TrackResult};
use crate::formulas;
use crate::state::GameState;

use super::{
    DroppedItem, Event, EventKind, STREAM_ABILITY, STREAM_EQUIPMENT, STREAM_PRIZE, STREAM_RARITY,
};

impl Event {
    /// A steal attempt. One prize roll; a rarity roll only when it lands.
    pub fn steal(
        state: &mut GameState,
        library: &DataLibrary,
        monster_name: &str,
        successful_steals: u32,
    ) -> TrackResult<Self> {
        let monster = library.monster(monster_name)?.clone();
        let before = state.snapshot();

        let roll = state.advance_rng(STREAM_PRIZE);
        let threshold = formulas::steal_threshold(monster.steal.base_chance, successful_steals);
        let success = formulas::steal_lands(roll, threshold);

        let item = if success {
            let rarity = state.advance_rng(STREAM_RARITY);
            let rare = formulas::is_rare(rarity);
            let picked = if rare { monster.steal.rare } else { monster.steal.common };
            state.add_to_inventory(picked.item, picked.quantity);
            Some(DroppedItem { item: picked.item, quantity: picked.quantity, rare })
        } else {
            None
        };

        let line = match &item {
            Some(d) => {
                let tag = if d.rare { " (rare)" } else { "" };
                format!("Steal from {}: {} x{}{tag}", monster.name, d.item, d.quantity)
            }
            None => format!("Steal from {}: failed", monster.name),
        };
        Ok(Self::applied(
            EventKind::Steal { monster: monster.name.clone(), success, item },
            before,
            vec![line],
        ))
    }

    /// A kill with full prize resolution.
    ///
    /// Draw order: one prize roll per item slot (two, always), a rarity roll
    /// per landed slot, then the equipment-drop roll, then the generation
    /// rolls when equipment drops. Overkill doubles item quantities; it is
    /// either forced by flag or derived from the killing-blow damage against
    /// the monster's overkill threshold.
    pub fn kill(
        state: &mut GameState,
        library: &DataLibrary,
        monster_name: &str,
        killer: Character,
        overkill: bool,
        killing_damage: Option<u32>,
    ) -> TrackResult<Self> {
        let monster = library.monster(monster_name)?.clone();
        let overkill =
            overkill || killing_damage.is_some_and(|d| d >= monster.overkill_threshold);
        let before = state.snapshot();

        let mut drops = Vec::new();
        for slot in 0..2 {
            let roll = state.advance_rng(STREAM_PRIZE);
            let Some(table) = monster.drops.get(slot) else { continue };
            if formulas::drop_lands(roll, table.chance) {
                let rarity = state.advance_rng(STREAM_RARITY);
                let rare = formulas::is_rare(rarity);
                let picked = if rare { table.rare } else { table.common };
                let quantity = if overkill { picked.quantity * 2 } else { picked.quantity };
                state.add_to_inventory(picked.item, quantity);
                drops.push(DroppedItem { item: picked.item, quantity, rare });
            }
        }

        state.add_gil(i64::from(monster.gil));

        let equipment_roll = state.advance_rng(STREAM_PRIZE);
        let equipment = if formulas::drop_lands(equipment_roll, monster.equipment.chance) {
            Some(generate_equipment(state, &monster.equipment, Some(killer)))
        } else {
            None
        };

        // A fielded copy of the monster dies with the event.
        if let Some(fallen) = state
            .monster_party
            .iter_mut()
            .find(|m| !m.is_out() && m.name().starts_with(&monster.name))
        {
            fallen.current_hp = 0;
            fallen.add_status(Status::Death, 1);
        }

        let mut lines = vec![format!(
            "Kill {}{} by {} (+{} gil)",
            monster.name,
            if overkill { " (overkill)" } else { "" },
            killer,
            monster.gil
        )];
        for d in &drops {
            let tag = if d.rare { " (rare)" } else { "" };
            lines.push(format!("  drop: {} x{}{tag}", d.item, d.quantity));
        }
        if let Some(e) = &equipment {
            lines.push(format!("  equipment: {} [{}]", e.name(), e.owner));
        }

        Ok(Self::applied(
            EventKind::Kill {
                monster: monster.name.clone(),
                killer,
                overkill,
                drops,
                gil: monster.gil,
                equipment,
            },
            before,
            lines,
        ))
    }

    /// A bribe. Skips the item-slot rolls entirely; the fixed bribe reward
    /// replaces them. The equipment-drop roll still happens.
    pub fn bribe(
        state: &mut GameState,
        library: &DataLibrary,
        monster_name: &str,
        briber: Character,
    ) -> TrackResult<Self> {
        let monster = library.monster(monster_name)?.clone();
        let Some(bribe) = monster.bribe else {
            return Err(TrackError::EventParsing(format!(
                "{} cannot be bribed",
                monster.name
            )));
        };
        let before = state.snapshot();

        state.add_gil(-i64::from(bribe.cost));
        state.add_to_inventory(bribe.item, bribe.quantity);
        let reward =
            Some(DroppedItem { item: bribe.item, quantity: bribe.quantity, rare: false });

        let equipment_roll = state.advance_rng(STREAM_PRIZE);
        let equipment = if formulas::drop_lands(equipment_roll, monster.equipment.chance) {
            Some(generate_equipment(state, &monster.equipment, Some(briber)))
        } else {
            None
        };

        let mut lines = vec![format!(
            "Bribe {} by {}: -{} gil, {} x{}",
            monster.name, briber, bribe.cost, bribe.item, bribe.quantity
        )];
        if let Some(e) = &equipment {
            lines.push(format!("  equipment: {} [{}]", e.name(), e.owner));
        }

        Ok(Self::applied(
            EventKind::Bribe {
                monster: monster.name.clone(),
                briber,
                cost: bribe.cost,
                reward,
                equipment,
            },
            before,
            lines,
        ))
    }

    /// A death outside combat resolution. Always burns three prize-stream
    /// draws, whether or not a character is named.
    pub fn death(state: &mut GameState, character: Option<Character>) -> Self {
        let before = state.snapshot();
        for _ in 0..3 {
            state.advance_rng(STREAM_PRIZE);
        }
        if let Some(c) = character
            && let Some(actor) = state.characters.get_mut(&c)
        {
            actor.current_hp = 0;
            actor.add_status(Status::Death, 1);
        }
        let line = match character {
            Some(c) => format!("Death: {c}"),
            None => "Death".to_string(),
        };
        Self::applied(EventKind::Death { character }, before, vec![line])
    }
}

/// Generate one piece of equipment from its four generation rolls plus one
/// ability roll per kept ability.
///
/// Owner selection walks the active party with the killer's entry weighted
/// three extra times before the modulo pick. That asymmetry is the real
/// drop bias; do not even it out.
pub(super) fn generate_equipment(
    state: &mut GameState,
    table: &EquipmentDropTable,
    killer: Option<Character>,
) -> Equipment {
    let owner_roll = state.advance_rng(STREAM_EQUIPMENT);
    let kind_roll = state.advance_rng(STREAM_EQUIPMENT);
    let slots_roll = state.advance_rng(STREAM_EQUIPMENT);
    let count_roll = state.advance_rng(STREAM_EQUIPMENT);

    let mut pool: Vec<Character> = state.party.clone();
    if pool.is_empty() {
        pool.push(Character::Tidus);
    }
    if let Some(k) = killer
        && state.party.contains(&k)
    {
        for _ in 0..3 {
            pool.push(k);
        }
    }
    let owner = pool[owner_roll as usize % pool.len()];

    let kind = if kind_roll & 1 == 0 { EquipmentKind::Weapon } else { EquipmentKind::Armor };
    let slots = formulas::equipment_slots(slots_roll, table.slots_modifier);
    let ability_rolls = formulas::equipment_ability_rolls(count_roll, table.ability_rolls_modifier);

    let ability_pool = table.pool(kind, owner);
    let mut abilities = Vec::new();
    if let Some(Some(forced)) = ability_pool.first() {
        abilities.push(*forced);
    }
    for _ in 0..ability_rolls {
        if abilities.len() as u32 >= slots {
            break;
        }
        let roll = state.advance_rng(STREAM_ABILITY);
        let index = formulas::ability_pool_index(roll);
        if let Some(Some(ability)) = ability_pool.get(index)
            && !abilities.contains(ability)
        {
            abilities.push(*ability);
        }
    }

    state.equipment_drops += 1;
    Equipment::new(owner, kind, slots, abilities, table.base_weapon_damage, table.bonus_crit)
}
