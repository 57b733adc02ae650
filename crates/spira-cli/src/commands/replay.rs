use std::fs;
use std::path::Path;

use colored::Colorize;
use spira_data::DataLibrary;
use spira_rng::RngStreamBank;
use spira_track::Tracker;

pub fn run(file: &Path, seed: u32, monsters: Option<&Path>) -> Result<(), String> {
    let script = fs::read_to_string(file)
        .map_err(|e| format!("could not read {}: {e}", file.display()))?;

    let mut library = DataLibrary::builtin();
    if let Some(path) = monsters {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {e}", path.display()))?;
        let loaded = library.load_monsters_json(&json).map_err(|e| e.to_string())?;
        println!("  {}", format!("loaded {loaded} extra monsters").dimmed());
    }

    let mut tracker = Tracker::with_library(RngStreamBank::new(seed), library);
    println!("  {} {} (seed {seed})", "Replay".bold(), file.display());
    println!();

    for line in script.lines() {
        let event = tracker.execute_line(line);
        for rendered in event.lines() {
            if rendered.starts_with("# !") {
                println!("  {}", rendered.red());
            } else if rendered.starts_with('#') {
                println!("  {}", rendered.dimmed());
            } else {
                println!("  {rendered}");
            }
        }
    }

    println!();
    let state = tracker.state();
    println!(
        "  {} {} events, {} gil, {} encounters",
        "Done:".bold(),
        tracker.events().len(),
        state.gil,
        state.encounters_count
    );
    Ok(())
}
