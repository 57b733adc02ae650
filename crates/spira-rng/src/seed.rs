//! Seed derivation and resolution.
//!
//! The game derives its 68 initial stream states from one 32-bit seed. A
//! runner almost never knows the seed directly; what they can observe is the
//! damage dealt by the first few attacks of the opening fight, which leak
//! enough generator output to identify the seed. This module supports both
//! directions: deriving states from a known seed, and recovering the seed
//! from observed damage values via table lookup or a bounded search.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::STREAM_COUNT;
use crate::constants::{STREAM_CONSTANTS, SEED_INCREMENT, SEED_MULTIPLIER, rotate16};
use crate::error::{RngError, RngResult};
use crate::stream::RngStream;

/// Derive the 68 initial stream states from a raw seed.
///
/// One iteration of `state = rotate16(state * K1 + K2)` per stream index,
/// in index order; stream `k` takes the state after iteration `k`.
pub fn initial_states(seed: u32) -> [i32; STREAM_COUNT] {
    let mut states = [0i32; STREAM_COUNT];
    let mut state = seed as i32;
    for slot in &mut states {
        state = rotate16(
            state
                .wrapping_mul(SEED_MULTIPLIER)
                .wrapping_add(SEED_INCREMENT),
        );
        *slot = state;
    }
    states
}

// Opening fight facts used for seed identification. Party order is fixed
// (Tidus in slot 0, Auron in slot 1) and the two alternate attacks starting
// with Auron, so observed value 2k belongs to Auron and 2k+1 to Tidus.
const AURON_BASE_DAMAGE: u32 = 260;
const TIDUS_BASE_DAMAGE: u32 = 125;
const AURON_CRIT_CHANCE: u32 = 17;
const TIDUS_CRIT_CHANCE: u32 = 18;
const AURON_DAMAGE_STREAM: usize = 21;
const TIDUS_DAMAGE_STREAM: usize = 20;

/// Fewest observed values that can identify a seed.
pub const MIN_DAMAGE_VALUES: usize = 3;

/// Highest frame count tried by the bounded brute-force search.
pub const FRAME_LIMIT: u32 = 3600;

fn base_damage_for_slot(slot: usize) -> u32 {
    if slot % 2 == 0 {
        AURON_BASE_DAMAGE
    } else {
        TIDUS_BASE_DAMAGE
    }
}

/// Whether `value` is a possible non-crit damage roll for the given base.
fn in_variance_family(base: u32, value: u32) -> bool {
    (0..31).any(|v| (base * (240 + v)) >> 8 == value)
}

/// Validate observed damage values against the game-legal sets.
///
/// A value outside its slot's set is accepted only if its half is inside it
/// (a crit-doubled roll); anything else is an error. This is the one place
/// where input is ever "corrected", and only by this documented rule.
pub fn validate_damage_values(values: &[u32]) -> RngResult<()> {
    for (slot, &value) in values.iter().enumerate() {
        let base = base_damage_for_slot(slot);
        let legal = in_variance_family(base, value)
            || (value % 2 == 0 && in_variance_family(base, value / 2));
        if !legal {
            return Err(RngError::InvalidDamageValue { slot, value });
        }
    }
    Ok(())
}

/// Regenerate the first `n` opening-fight damage values for a seed.
///
/// Consumes two values per attack (crit roll, then damage roll) from the
/// attacker's per-slot damage stream, exactly as the game does.
pub fn simulate_damage_values(seed: u32, n: usize) -> Vec<u32> {
    let states = initial_states(seed);
    let mut tidus = stream_for(TIDUS_DAMAGE_STREAM, &states);
    let mut auron = stream_for(AURON_DAMAGE_STREAM, &states);

    let mut values = Vec::with_capacity(n);
    for i in 0..n {
        let (stream, base, crit_chance) = if i % 2 == 0 {
            (&mut auron, AURON_BASE_DAMAGE, AURON_CRIT_CHANCE)
        } else {
            (&mut tidus, TIDUS_BASE_DAMAGE, TIDUS_CRIT_CHANCE)
        };
        let crit_roll = stream.advance();
        let damage_roll = stream.advance();
        let mut damage = (base * (240 + damage_roll % 31)) >> 8;
        if crit_roll % 101 < crit_chance {
            damage *= 2;
        }
        values.push(damage);
    }
    values
}

fn stream_for(index: usize, states: &[i32; STREAM_COUNT]) -> RngStream {
    let (c1, c2) = STREAM_CONSTANTS[index];
    RngStream::new(states[index], c1, c2)
}

/// One precomputed mapping from early outputs to a seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTableRow {
    /// The opening-fight damage values this row matches, in order.
    pub damage_values: Vec<u32>,
    /// The seed that produces them.
    pub seed: u32,
}

/// A precomputed table mapping observed damage values to seeds.
///
/// The console variants with an unbounded candidate space ship such a table;
/// a row matches only when every listed value equals the observed value at
/// the same position and the lengths agree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedTable {
    rows: Vec<SeedTableRow>,
}

impl SeedTable {
    /// Build a table by regenerating `values_per_row` damage values for
    /// each seed.
    pub fn from_seeds(seeds: &[u32], values_per_row: usize) -> Self {
        let rows = seeds
            .iter()
            .map(|&seed| SeedTableRow {
                damage_values: simulate_damage_values(seed, values_per_row),
                seed,
            })
            .collect();
        Self { rows }
    }

    /// Parse a table from its JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the seed whose row matches the observed values exactly.
    pub fn lookup(&self, observed: &[u32]) -> Option<u32> {
        self.rows
            .iter()
            .find(|row| row.damage_values == observed)
            .map(|row| row.seed)
    }
}

/// Which release of the game produced the observed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// Original console release. Seeds span the whole 32-bit space, so only
    /// table lookup can resolve observed values.
    Ps2,
    /// Remaster. The seed is a product of boot frame count and a
    /// datetime-derived constant, which bounds the search space.
    Hd,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ps2 => write!(f, "PS2"),
            Self::Hd => write!(f, "HD"),
        }
    }
}

/// Candidate xor constants for a boot date.
///
/// The remaster folds the console clock into the seed; for a known date the
/// time-of-day component only contributes these 64 candidates.
pub fn date_xor_candidates(date: NaiveDate) -> Vec<u32> {
    let base = (date.year() as u32)
        .wrapping_mul(10_000)
        .wrapping_add(date.month() * 100)
        .wrapping_add(date.day());
    (0..64)
        .map(|h| base.wrapping_mul(0x9E37_79B1) ^ (h * 0x0010_0001))
        .collect()
}

/// The seed produced by a boot frame count and a datetime xor candidate.
pub fn candidate_seed(frame: u32, xor_candidate: u32) -> u32 {
    (frame + 1).wrapping_mul(xor_candidate)
}

/// Resolves the session seed from either a raw number or observed values.
#[derive(Debug, Clone)]
pub struct SeedResolver {
    platform: Platform,
    table: Option<SeedTable>,
    date: Option<NaiveDate>,
}

impl SeedResolver {
    /// Create a resolver for a platform.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            table: None,
            date: None,
        }
    }

    /// Attach a precomputed seed table.
    pub fn with_table(mut self, table: SeedTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Pin the boot date used to derive brute-force candidates.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// The platform this resolver searches.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Resolve a seed from observed opening-fight damage values.
    ///
    /// Values are validated first; then the table (if any) is consulted;
    /// then, on HD only, every bounded candidate is tried. No match is a
    /// typed error, never a guessed seed.
    pub fn resolve(&self, observed: &[u32]) -> RngResult<u32> {
        validate_damage_values(observed)?;
        if observed.len() < MIN_DAMAGE_VALUES {
            return Err(RngError::SeedNotFound);
        }

        if let Some(table) = &self.table
            && let Some(seed) = table.lookup(observed)
        {
            return Ok(seed);
        }

        match self.platform {
            // No bounded candidate space: fail fast instead of searching.
            Platform::Ps2 => Err(RngError::SeedNotFound),
            Platform::Hd => self.brute_force(observed),
        }
    }

    fn brute_force(&self, observed: &[u32]) -> RngResult<u32> {
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());
        let candidates = date_xor_candidates(date);
        for frame in 0..=FRAME_LIMIT {
            for &xor in &candidates {
                let seed = candidate_seed(frame, xor);
                if simulate_damage_values(seed, observed.len()) == observed {
                    return Ok(seed);
                }
            }
        }
        Err(RngError::SeedNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_states_deterministic() {
        assert_eq!(initial_states(42), initial_states(42));
        assert_ne!(initial_states(42), initial_states(43));
    }

    #[test]
    fn initial_states_cover_all_streams() {
        let states = initial_states(0);
        // The derivation must not leave runs of identical states.
        let distinct: std::collections::BTreeSet<i32> = states.iter().copied().collect();
        assert!(distinct.len() > STREAM_COUNT / 2);
    }

    #[test]
    fn simulated_values_are_legal() {
        for seed in [0u32, 1, 42, 0xffff_ffff, 123_456_789] {
            let values = simulate_damage_values(seed, 8);
            assert!(validate_damage_values(&values).is_ok(), "seed {seed}");
        }
    }

    #[test]
    fn validate_rejects_garbage() {
        let err = validate_damage_values(&[9999]).unwrap_err();
        assert_eq!(
            err,
            RngError::InvalidDamageValue {
                slot: 0,
                value: 9999
            }
        );
    }

    #[test]
    fn validate_accepts_crit_doubled() {
        // Any legal non-crit value doubled must pass via the fallback.
        let base = (260 * 240) >> 8;
        assert!(validate_damage_values(&[base * 2]).is_ok());
    }

    #[test]
    fn validate_reports_offending_slot() {
        let mut values = simulate_damage_values(42, 4);
        values[2] = 1;
        let err = validate_damage_values(&values).unwrap_err();
        assert_eq!(err, RngError::InvalidDamageValue { slot: 2, value: 1 });
    }

    #[test]
    fn table_lookup_roundtrip() {
        let seeds = [5u32, 77, 901, 44_000];
        let table = SeedTable::from_seeds(&seeds, 4);
        for &seed in &seeds {
            let observed = simulate_damage_values(seed, 4);
            assert_eq!(table.lookup(&observed), Some(seed));
        }
    }

    #[test]
    fn table_lookup_requires_exact_match() {
        let table = SeedTable::from_seeds(&[5], 4);
        let mut observed = simulate_damage_values(5, 4);
        // A shorter list must not match the 4-value row.
        assert_eq!(table.lookup(&observed[..3]), None);
        observed[3] = observed[3].wrapping_add(1);
        assert_eq!(table.lookup(&observed), None);
    }

    #[test]
    fn table_json_roundtrip() {
        let table = SeedTable::from_seeds(&[11, 22], 3);
        let json = serde_json::to_string(&table).unwrap();
        let parsed = SeedTable::from_json(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        let observed = simulate_damage_values(22, 3);
        assert_eq!(parsed.lookup(&observed), Some(22));
    }

    #[test]
    fn resolver_table_mode() {
        let table = SeedTable::from_seeds(&[314_159], 4);
        let resolver = SeedResolver::new(Platform::Ps2).with_table(table);
        let observed = simulate_damage_values(314_159, 4);
        assert_eq!(resolver.resolve(&observed), Ok(314_159));
    }

    #[test]
    fn ps2_without_table_match_fails_fast() {
        let resolver = SeedResolver::new(Platform::Ps2);
        let observed = simulate_damage_values(1, 4);
        assert_eq!(resolver.resolve(&observed), Err(RngError::SeedNotFound));
    }

    #[test]
    fn hd_brute_force_finds_bounded_seed() {
        let date = NaiveDate::from_ymd_opt(2003, 12, 17).unwrap();
        let candidates = date_xor_candidates(date);
        let seed = candidate_seed(4, candidates[9]);

        let observed = simulate_damage_values(seed, 4);
        let resolver = SeedResolver::new(Platform::Hd).with_date(date);
        let resolved = resolver.resolve(&observed).unwrap();

        // The search may land on an earlier candidate that happens to
        // produce the same diagnostics; what matters is exact reproduction.
        assert_eq!(simulate_damage_values(resolved, 4), observed);
    }

    #[test]
    fn direct_vs_observed_consistency() {
        // Resolving from observed values and regenerating those values from
        // the resolved seed must reproduce the originals exactly.
        let table = SeedTable::from_seeds(&[0xCAFE], 6);
        let resolver = SeedResolver::new(Platform::Ps2).with_table(table);
        let observed = simulate_damage_values(0xCAFE, 6);
        let seed = resolver.resolve(&observed).unwrap();
        assert_eq!(simulate_damage_values(seed, 6), observed);
    }

    #[test]
    fn resolve_validates_before_searching() {
        let resolver = SeedResolver::new(Platform::Hd);
        let err = resolver.resolve(&[260, 1, 260]).unwrap_err();
        assert!(matches!(err, RngError::InvalidDamageValue { slot: 1, .. }));
    }

    #[test]
    fn too_few_values_never_resolve() {
        let resolver = SeedResolver::new(Platform::Hd);
        let observed = simulate_damage_values(1, 2);
        assert_eq!(resolver.resolve(&observed), Err(RngError::SeedNotFound));
    }
}
