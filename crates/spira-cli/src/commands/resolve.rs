use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;
use spira_rng::{Platform, SeedResolver, SeedTable};

pub fn run(
    values: &[u32],
    platform: &str,
    date: Option<&str>,
    table: Option<&Path>,
) -> Result<(), String> {
    if values.is_empty() {
        return Err("no damage values given".into());
    }
    let platform = match platform.to_lowercase().as_str() {
        "hd" => Platform::Hd,
        "ps2" => Platform::Ps2,
        other => return Err(format!("platform must be hd or ps2, got {other}")),
    };

    let mut resolver = SeedResolver::new(platform);
    if let Some(path) = table {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {e}", path.display()))?;
        let table = SeedTable::from_json(&json)
            .map_err(|e| format!("malformed seed table: {e}"))?;
        resolver = resolver.with_table(table);
    }
    if let Some(raw) = date {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| format!("date must be YYYY-MM-DD: {e}"))?;
        resolver = resolver.with_date(date);
    }

    let seed = resolver.resolve(values).map_err(|e| e.to_string())?;
    println!(
        "  {} {seed} (0x{seed:08x}) {}",
        "Seed".bold().green(),
        format!("from {} observed values on {platform}", values.len()).dimmed()
    );
    Ok(())
}
