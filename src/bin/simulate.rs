//! Batch game simulation CLI.
//!
//! Plays complete games on random rings and writes one JSON line per game.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};

use assassin::config::init_logging;
use assassin::simulate::{run_simulation, write_jsonl, SimulationConfig};

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "Play random assassin games to completion")]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Participants per game.
    #[arg(long, default_value_t = 20)]
    players: usize,

    /// Base random seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of parallel threads.
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Output file path (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    let config = SimulationConfig {
        games: args.games,
        players: args.players,
        seed: args.seed,
        threads: args.threads,
    };

    info!(
        games = config.games,
        players = config.players,
        threads = config.threads,
        "starting simulation"
    );
    let start = Instant::now();
    let games = match run_simulation(&config) {
        Ok(games) => games,
        Err(e) => {
            error!(error = %e, "simulation failed");
            return ExitCode::FAILURE;
        }
    };
    info!(
        games = games.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "simulation complete"
    );

    let written = match &args.output {
        Some(path) => File::create(path).and_then(|f| write_jsonl(&games, &mut BufWriter::new(f))),
        None => write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::FAILURE
        }
    }
}
