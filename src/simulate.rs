//! Random play-outs of complete games.
//!
//! Each game builds a ring of synthetic participants and lets a random
//! alive participant score a kill until one remains, checking the ring
//! invariants after every step. Games are independent and run in parallel.

use std::io::{self, Write};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::ring::{build_ring, ParticipantId, RingError};

/// Configuration for a batch of simulated games.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub games: usize,
    /// Participants per game.
    pub players: usize,
    /// Base seed; game `i` uses `seed + i`.
    pub seed: u64,
    /// Worker threads (1 = sequential).
    pub threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            games: 10,
            players: 20,
            seed: 0,
            threads: 4,
        }
    }
}

/// Summary of one simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedGame {
    pub seed: u64,
    pub players: usize,
    pub winner: ParticipantId,
    /// Kill count of the winner.
    pub winner_kills: u32,
    /// Highest kill count of anyone in the game.
    pub max_kills: u32,
}

/// Plays one game to completion.
pub fn simulate_game(players: usize, seed: u64) -> Result<SimulatedGame, RingError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let ids = (0..players)
        .map(|i| ParticipantId::new(&format!("p{i:04}")))
        .collect::<Result<Vec<_>, _>>()?;
    let mut state = build_ring(&format!("sim-{seed}"), ids, &mut rng)?;
    state.check_invariants()?;

    while state.alive.len() > 1 {
        let Some(killer) = state.alive.choose(&mut rng).cloned() else {
            break;
        };
        state.record_kill(&killer)?;
        state.check_invariants()?;
    }

    let winner = state
        .winner()
        .cloned()
        .ok_or_else(|| RingError::CorruptState("simulation ended without a winner".to_string()))?;
    Ok(SimulatedGame {
        seed,
        players,
        winner_kills: state.kills(&winner),
        max_kills: state.kill_counts.values().copied().max().unwrap_or(0),
        winner,
    })
}

/// Plays `config.games` games, in parallel when `config.threads > 1`.
pub fn run_simulation(config: &SimulationConfig) -> Result<Vec<SimulatedGame>, RingError> {
    use rayon::prelude::*;

    let seeds: Vec<u64> = (0..config.games as u64)
        .map(|i| config.seed.wrapping_add(i))
        .collect();

    if config.threads <= 1 {
        return seeds.iter().map(|&s| simulate_game(config.players, s)).collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| RingError::InvalidArgument(format!("cannot start worker pool: {e}")))?;
    pool.install(|| {
        seeds
            .par_iter()
            .map(|&s| simulate_game(config.players, s))
            .collect()
    })
}

/// Writes games as JSON Lines.
pub fn write_jsonl<W: Write>(games: &[SimulatedGame], out: &mut W) -> io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_ends_with_one_winner() {
        let game = simulate_game(8, 17).unwrap();
        assert_eq!(game.players, 8);
        assert!(game.max_kills >= 1);
        assert!(game.winner_kills <= 7);
    }

    #[test]
    fn single_player_wins_immediately() {
        let game = simulate_game(1, 0).unwrap();
        assert_eq!(game.winner.as_str(), "p0000");
        assert_eq!(game.max_kills, 0);
    }

    #[test]
    fn zero_players_is_invalid() {
        assert!(matches!(
            simulate_game(0, 0),
            Err(RingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut config = SimulationConfig {
            games: 6,
            players: 12,
            seed: 100,
            threads: 1,
        };
        let sequential = run_simulation(&config).unwrap();
        config.threads = 3;
        let parallel = run_simulation(&config).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn jsonl_has_one_line_per_game() {
        let games = run_simulation(&SimulationConfig {
            games: 3,
            players: 5,
            seed: 1,
            threads: 1,
        })
        .unwrap();
        let mut out = Vec::new();
        write_jsonl(&games, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l.contains("\"winner\"")));
    }
}
