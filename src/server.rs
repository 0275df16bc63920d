//! Protocol server state.
//!
//! Owns the request-layer `Service` and turns each parsed `Command` into
//! exactly one response line.

use std::fs::File;
use std::io::{self, BufReader, Write};

use serde::Serialize;
use tracing::{info, warn};

use crate::notify::Notifier;
use crate::protocol::Command;
use crate::service::{Service, ServiceError};
use crate::store::GameStore;

/// What the main loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Server<S, N> {
    service: Service<S, N>,
}

impl<S: GameStore, N: Notifier> Server<S, N> {
    pub fn new(service: Service<S, N>) -> Self {
        Server { service }
    }

    pub fn service(&self) -> &Service<S, N> {
        &self.service
    }

    /// Executes `cmd` and writes its response line to `out`.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<Flow> {
        match cmd {
            Command::IsReady => writeln!(out, "readyok")?,
            Command::Quit => return Ok(Flow::Quit),

            Command::NewGame { game, ids, secret } => match self.service.create_game(&game, ids, &secret) {
                Ok(state) => writeln!(out, "created {} {}", game, state.alive.len())?,
                Err(e) => write_error(out, &e)?,
            },
            Command::AddPlayer { game, id, secret } => {
                match self.service.add_participant(&game, id, &secret) {
                    Ok(state) => writeln!(out, "reshuffled {} {}", game, state.alive.len())?,
                    Err(e) => write_error(out, &e)?,
                }
            }
            Command::Kill { game, killer, secret } => {
                match self.service.record_kill(&game, &killer, &secret) {
                    Ok(kill) => writeln!(out, "killed {} next {}", kill.eliminated, kill.new_target)?,
                    Err(e) => write_error(out, &e)?,
                }
            }
            Command::Remove { game, id, secret } => {
                match self.service.remove_participant(&game, &id, &secret) {
                    Ok(Some(removal)) => writeln!(out, "removed {}", removal.removed)?,
                    Ok(None) => writeln!(out, "unchanged {}", id)?,
                    Err(e) => write_error(out, &e)?,
                }
            }
            Command::Stats { game } => {
                let result = self.service.game_stats(&game);
                write_json(out, "stats", result)?;
            }
            Command::Leaderboard { game } => {
                let result = self.service.leaderboard(&game);
                write_json(out, "leaderboard", result)?;
            }
            Command::State { game } => {
                let result = self.service.game(&game);
                write_json(out, "state", result)?;
            }
            Command::Player { id } => {
                let result = self.service.participant(&id);
                write_json(out, "player", result)?;
            }
            Command::Import { game, path, secret } => match File::open(&path) {
                Ok(file) => match self.service.import_roster(&game, BufReader::new(file), &secret) {
                    Ok(report) => writeln!(
                        out,
                        "imported {} {} skipped {}",
                        report.game, report.imported, report.skipped
                    )?,
                    Err(e) => write_error(out, &e)?,
                },
                Err(e) => {
                    warn!(path = %path, error = %e, "cannot open roster");
                    writeln!(out, "error roster cannot open '{}': {}", path, e)?;
                }
            },
        }
        out.flush()?;
        Ok(Flow::Continue)
    }
}

fn write_error<W: Write>(out: &mut W, err: &ServiceError) -> io::Result<()> {
    if err.is_benign() {
        info!(error = %err, "request was a no-op");
    } else {
        warn!(kind = err.kind(), error = %err, "request failed");
    }
    writeln!(out, "error {} {}", err.kind(), err)
}

fn write_json<W: Write, T: Serialize>(
    out: &mut W,
    keyword: &str,
    result: Result<T, ServiceError>,
) -> io::Result<()> {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => writeln!(out, "{keyword} {json}"),
            Err(e) => writeln!(out, "error internal {e}"),
        },
        Err(e) => write_error(out, &e),
    }
}
