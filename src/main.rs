//! Assassin game server.
//!
//! Reads commands from stdin and writes one response line per command to
//! stdout. Logs go to stderr.

use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use assassin::config::{init_logging, Config};
use assassin::notify::{LogNotifier, Notifier};
use assassin::protocol::parse_command;
use assassin::server::{Flow, Server};
use assassin::service::Service;
use assassin::store::{GameStore, JsonDirStore, MemoryStore};

/// Runs the main protocol loop until `quit` or end of input.
fn serve<S: GameStore, N: Notifier>(mut server: Server<S, N>) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(cmd) = parse_command(&line) else {
            continue;
        };
        if server.handle(cmd, &mut out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    let rng = config.rng();

    let result = match &config.store_dir {
        Some(dir) => match JsonDirStore::open(dir) {
            Ok(store) => {
                info!(dir = %dir.display(), "using JSON store");
                serve(Server::new(Service::with_rng(store, LogNotifier, config.admin_secret.clone(), rng)))
            }
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "cannot open store");
                return ExitCode::FAILURE;
            }
        },
        None => {
            info!("using in-memory store");
            serve(Server::new(Service::with_rng(
                MemoryStore::new(),
                LogNotifier,
                config.admin_secret.clone(),
                rng,
            )))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "I/O failure in protocol loop");
            ExitCode::FAILURE
        }
    }
}
