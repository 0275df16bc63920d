//! Line command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the server loop can dispatch on.

use tracing::warn;

use crate::ring::ParticipantId;

/// A parsed client-to-server command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; server replies `readyok`.
    IsReady,

    /// Create a game: `newgame <game> <secret> <id>...`.
    NewGame {
        game: String,
        ids: Vec<ParticipantId>,
        secret: String,
    },

    /// Add a participant and reshuffle: `addplayer <game> <id> <secret>`.
    AddPlayer {
        game: String,
        id: ParticipantId,
        secret: String,
    },

    /// Credit a kill: `kill <game> <killer> <secret>`.
    Kill {
        game: String,
        killer: ParticipantId,
        secret: String,
    },

    /// Administrative removal: `remove <game> <id> <secret>`.
    Remove {
        game: String,
        id: ParticipantId,
        secret: String,
    },

    /// Per-participant kills and alive flags: `stats <game>`.
    Stats { game: String },

    /// Participants ordered by kills: `leaderboard <game>`.
    Leaderboard { game: String },

    /// Full game record: `state <game>`.
    State { game: String },

    /// Participant profile: `player <id>`.
    Player { id: ParticipantId },

    /// Create a game from a JSON Lines roster: `import <game> <path> <secret>`.
    Import {
        game: String,
        path: String,
        secret: String,
    },

    /// Terminate the server.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&name, args) = tokens.split_first()?;

    match name {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),

        "newgame" => parse_newgame(args),
        "addplayer" => {
            let [game, id, secret] = expect_args::<3>(name, args, "addplayer <game> <id> <secret>")?;
            Some(Command::AddPlayer {
                game: game.to_string(),
                id: parse_id(id)?,
                secret: secret.to_string(),
            })
        }
        "kill" => {
            let [game, killer, secret] = expect_args::<3>(name, args, "kill <game> <killer> <secret>")?;
            Some(Command::Kill {
                game: game.to_string(),
                killer: parse_id(killer)?,
                secret: secret.to_string(),
            })
        }
        "remove" => {
            let [game, id, secret] = expect_args::<3>(name, args, "remove <game> <id> <secret>")?;
            Some(Command::Remove {
                game: game.to_string(),
                id: parse_id(id)?,
                secret: secret.to_string(),
            })
        }
        "stats" => {
            let [game] = expect_args::<1>(name, args, "stats <game>")?;
            Some(Command::Stats { game: game.to_string() })
        }
        "leaderboard" => {
            let [game] = expect_args::<1>(name, args, "leaderboard <game>")?;
            Some(Command::Leaderboard { game: game.to_string() })
        }
        "state" => {
            let [game] = expect_args::<1>(name, args, "state <game>")?;
            Some(Command::State { game: game.to_string() })
        }
        "player" => {
            let [id] = expect_args::<1>(name, args, "player <id>")?;
            Some(Command::Player { id: parse_id(id)? })
        }
        "import" => {
            let [game, path, secret] = expect_args::<3>(name, args, "import <game> <path> <secret>")?;
            Some(Command::Import {
                game: game.to_string(),
                path: path.to_string(),
                secret: secret.to_string(),
            })
        }

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Requires exactly `N` arguments.
fn expect_args<'a, const N: usize>(name: &str, args: &[&'a str], usage: &str) -> Option<[&'a str; N]> {
    match <[&str; N]>::try_from(args) {
        Ok(exact) => Some(exact),
        Err(_) => {
            warn!(command = name, usage, "malformed command");
            None
        }
    }
}

fn parse_id(raw: &str) -> Option<ParticipantId> {
    match ParticipantId::new(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(id = raw, error = %e, "invalid participant id");
            None
        }
    }
}

/// Parses `newgame <game> <secret> <id>...` (at least one id).
fn parse_newgame(args: &[&str]) -> Option<Command> {
    let (game, secret, ids) = match args {
        [game, secret, ids @ ..] if !ids.is_empty() => (game, secret, ids),
        _ => {
            warn!(command = "newgame", usage = "newgame <game> <secret> <id>...", "malformed command");
            return None;
        }
    };
    let ids = ids.iter().map(|raw| parse_id(raw)).collect::<Option<Vec<_>>>()?;
    Some(Command::NewGame {
        game: game.to_string(),
        ids,
        secret: secret.to_string(),
    })
}
