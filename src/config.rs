//! Server configuration from command-line flags and environment.

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Assassin game server: reads commands from stdin, one per line.
#[derive(Debug, Clone, Parser)]
#[command(name = "assassin", version, about)]
pub struct Config {
    /// Directory for JSON game and player records. In-memory if unset.
    #[arg(long, env = "ASSASSIN_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Shared secret required by every mutating command.
    #[arg(long, env = "ASSASSIN_ADMIN_SECRET", hide_env_values = true)]
    pub admin_secret: String,

    /// Fixed RNG seed for reproducible rings. Entropy if unset.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    /// RNG for ring shuffles, seeded per `--seed`.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
