//! The event family.
//!
//! Every discrete game occurrence is one [`Event`]: constructed from a
//! command, it draws from the stream bank in a fixed order, mutates
//! [`GameState`](crate::state::GameState), and records its outcome. The
//! draw order per event type is load-bearing; reordering a single draw
//! desynchronizes the session from the console.
//!
//! Rollback restores the game-side state captured before the event applied.
//! It never rewinds playheads; only a full replay does that.

mod combat;
mod encounter;
mod misc;
mod prize;

use spira_data::{Character, Equipment, Item, Status};

use crate::formulas::EncounterCondition;
use crate::state::{GameState, Snapshot};

/// Stream for the encounter-condition roll.
pub const STREAM_ENCOUNTER: usize = 1;
/// Default stream for target selection.
pub const STREAM_TARGET: usize = 4;
/// Stream for drop, steal, and death rolls.
pub const STREAM_PRIZE: usize = 10;
/// Stream for the common/rare split.
pub const STREAM_RARITY: usize = 11;
/// Stream for the four equipment-generation rolls.
pub const STREAM_EQUIPMENT: usize = 12;
/// Stream for equipment ability rolls.
pub const STREAM_ABILITY: usize = 13;
/// Stream for Yojimbo's motivation and free-attack rolls.
pub const STREAM_YOJIMBO: usize = 17;
/// First of the eight per-slot variance/hit/crit/damage streams.
pub const SLOT_VARIANCE_BASE: usize = 20;
/// First of the eight per-slot status-application streams.
pub const SLOT_STATUS_BASE: usize = 28;

/// Variance/hit/crit/damage stream for a battle slot.
pub fn variance_stream(slot: usize) -> usize {
    SLOT_VARIANCE_BASE + slot.min(7)
}

/// Status-application stream for a battle slot.
pub fn status_stream(slot: usize) -> usize {
    SLOT_STATUS_BASE + slot.min(7)
}

/// Target-selection stream for an acting character.
///
/// Three characters read a different stream than everyone else. These are
/// fixed exceptions observed on hardware; keep them as a lookup.
pub fn target_stream(actor: Option<Character>) -> usize {
    match actor {
        Some(Character::Kimahri) => 5,
        Some(Character::Lulu) => 6,
        Some(Character::Wakka) => 7,
        _ => STREAM_TARGET,
    }
}

/// What one resolved hit did to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitOutcome {
    /// Target display name.
    pub target: String,
    /// Whether the hit connected.
    pub hit: bool,
    /// Whether it crit.
    pub crit: bool,
    /// Damage dealt (or healing done, when `healed`).
    pub damage: u32,
    /// The damage healed instead of hurting.
    pub healed: bool,
    /// Statuses attempted, with whether each stuck.
    pub statuses: Vec<(Status, bool)>,
}

/// An item that dropped, with rarity and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedItem {
    /// The item.
    pub item: Item,
    /// Quantity awarded.
    pub quantity: u32,
    /// Whether the rare slot was selected.
    pub rare: bool,
}

/// The closed set of event types and their recorded outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A steal attempt against a monster.
    Steal {
        /// Monster name.
        monster: String,
        /// Whether the steal landed.
        success: bool,
        /// The stolen item, on success.
        item: Option<DroppedItem>,
    },
    /// A monster kill with its full prize resolution.
    Kill {
        /// Monster name.
        monster: String,
        /// Who landed the killing blow.
        killer: Character,
        /// Whether the kill was an overkill.
        overkill: bool,
        /// Items that dropped.
        drops: Vec<DroppedItem>,
        /// Gil awarded.
        gil: u32,
        /// Generated equipment, if any dropped.
        equipment: Option<Equipment>,
    },
    /// Paying a monster to leave.
    Bribe {
        /// Monster name.
        monster: String,
        /// Who paid.
        briber: Character,
        /// Gil spent.
        cost: u32,
        /// Items received.
        reward: Option<DroppedItem>,
        /// Generated equipment, if any dropped.
        equipment: Option<Equipment>,
    },
    /// A scripted (boss) encounter.
    Encounter {
        /// Monsters fielded.
        monsters: Vec<String>,
        /// How the encounter opened.
        condition: EncounterCondition,
        /// A forced condition that overrode the roll, if any.
        forced: Option<EncounterCondition>,
    },
    /// A random encounter in one zone.
    RandomEncounter {
        /// Zone name.
        zone: String,
        /// Monster that appeared.
        monster: String,
        /// How the encounter opened.
        condition: EncounterCondition,
    },
    /// An encounter simulated for its draws only; nothing is fielded.
    SimulatedEncounter {
        /// How the encounter would have opened.
        condition: EncounterCondition,
    },
    /// A random encounter counted against several zones at once.
    MultizoneRandomEncounter {
        /// Zones involved.
        zones: Vec<String>,
        /// Monster that appeared.
        monster: String,
        /// How the encounter opened.
        condition: EncounterCondition,
    },
    /// A party member's battle action.
    CharacterAction {
        /// The actor.
        actor: Character,
        /// Action name.
        action: String,
        /// Per-target results.
        outcomes: Vec<HitOutcome>,
    },
    /// A monster's battle action.
    MonsterAction {
        /// Acting monster's display name.
        actor: String,
        /// Action name.
        action: String,
        /// Per-target results.
        outcomes: Vec<HitOutcome>,
    },
    /// An escape attempt.
    Escape {
        /// Who ran.
        character: Character,
        /// Whether they got away.
        success: bool,
    },
    /// One Yojimbo turn: motivation, attack choice, payment.
    YojimboTurn {
        /// Computed motivation after resistance scaling.
        motivation: u32,
        /// Attack Yojimbo chose.
        attack: String,
        /// Gil actually spent.
        gil_spent: u32,
        /// Whether the free-attack branch fired.
        free: bool,
    },
    /// Manually burned draws on one stream.
    AdvanceRng {
        /// Stream index.
        stream: usize,
        /// Draw count.
        times: usize,
    },
    /// Roster change.
    ChangeParty {
        /// The new roster, in order.
        party: Vec<Character>,
    },
    /// Direct stat override.
    ChangeStat {
        /// Whose stat changed.
        actor: String,
        /// Stat name.
        stat: spira_data::Stat,
        /// New value after clamping.
        value: u32,
    },
    /// Equipment change.
    ChangeEquipment {
        /// Who re-equipped.
        character: Character,
        /// Display name of the new piece.
        name: String,
    },
    /// A death outside normal damage resolution.
    Death {
        /// Who died, if tracked.
        character: Option<Character>,
    },
    /// An inert diagnostic or comment line. Mutates nothing.
    Comment {
        /// The text.
        text: String,
    },
}

/// One applied event: its kind, outcome description, and the state image
/// needed to roll it back.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    before: Snapshot,
    lines: Vec<String>,
}

impl Event {
    pub(crate) fn applied(kind: EventKind, before: Snapshot, lines: Vec<String>) -> Self {
        Self { kind, before, lines }
    }

    /// An inert comment event; captures state only to satisfy the rollback
    /// contract (restoring it is a no-op).
    pub fn comment(state: &GameState, text: impl Into<String>) -> Self {
        let text = text.into();
        let line = if text.is_empty() { "#".to_string() } else { format!("# {text}") };
        Self {
            kind: EventKind::Comment { text },
            before: state.snapshot(),
            lines: vec![line],
        }
    }

    /// The event's kind and recorded outcome.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Undo this event's state mutation. Stream playheads stay put.
    pub fn rollback(&self, state: &mut GameState) {
        state.restore(self.before.clone());
    }

    /// The description lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

pub(crate) fn describe_hit(outcome: &HitOutcome, action: &str) -> String {
    let mut line = if !outcome.hit {
        format!("  {} misses {}", action, outcome.target)
    } else if outcome.healed {
        format!("  {} heals {} for {}", action, outcome.target, outcome.damage)
    } else {
        let crit = if outcome.crit { " (crit)" } else { "" };
        format!("  {} hits {} for {}{}", action, outcome.target, outcome.damage, crit)
    };
    for (status, landed) in &outcome.statuses {
        let verb = if *landed { "inflicts" } else { "fails" };
        line.push_str(&format!(" [{verb} {status}]"));
    }
    line
}
