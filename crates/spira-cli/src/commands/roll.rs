use colored::Colorize;
use spira_rng::{RngStreamBank, STREAM_COUNT};

pub fn run(stream: usize, count: usize, seed: u32) -> Result<(), String> {
    if stream >= STREAM_COUNT {
        return Err(format!("stream index {stream} out of range (0..{STREAM_COUNT})"));
    }
    let mut bank = RngStreamBank::new(seed);
    let values = bank.upcoming(stream, count);

    println!(
        "  {} rng{stream}, seed {seed} {}",
        "Stream".bold(),
        format!("(next {count} values)").dimmed()
    );
    for (offset, value) in values.iter().enumerate() {
        println!("  {:>4}  {value}", format!("+{offset}").dimmed());
    }
    Ok(())
}
