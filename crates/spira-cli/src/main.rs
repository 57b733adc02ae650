//! CLI frontend for the Spira RNG tracker.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "spira",
    about = "Spira: deterministic RNG tracking for speedrun routing",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the opening values of the notable streams for a seed
    Seed {
        /// The 32-bit seed
        seed: u32,

        /// Values to show per stream
        #[arg(short, long, default_value = "8")]
        count: usize,
    },

    /// Resolve a seed from observed opening-fight damage values
    Resolve {
        /// Damage values in the order the fight produced them
        values: Vec<u32>,

        /// Platform variant: hd or ps2
        #[arg(short, long, default_value = "hd")]
        platform: String,

        /// Console date as YYYY-MM-DD (HD brute force)
        #[arg(short, long)]
        date: Option<String>,

        /// JSON seed table for exact-match lookup
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Replay a script file and print every event
    Replay {
        /// Path to the script
        file: PathBuf,

        /// The 32-bit seed
        #[arg(short, long)]
        seed: u32,

        /// Extra monster table (JSON array) merged over the built-ins
        #[arg(short, long)]
        monsters: Option<PathBuf>,
    },

    /// Preview upcoming values of one stream
    Roll {
        /// Stream index (0..68)
        stream: usize,

        /// Number of values
        count: usize,

        /// The 32-bit seed
        #[arg(short, long)]
        seed: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Seed { seed, count } => commands::seed::run(seed, count),
        Commands::Resolve { values, platform, date, table } => {
            commands::resolve::run(&values, &platform, date.as_deref(), table.as_deref())
        }
        Commands::Replay { file, seed, monsters } => {
            commands::replay::run(&file, seed, monsters.as_deref())
        }
        Commands::Roll { stream, count, seed } => commands::roll::run(stream, count, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
