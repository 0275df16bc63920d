//! Request layer around the ring engine.
//!
//! Each mutating call loads one game, validates it, applies exactly one
//! engine operation, saves under the loaded version, and then tells the
//! affected participants what changed. `&mut self` serializes calls within
//! a process; the store's version check catches writers outside it.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::{Mutex, PoisonError};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::notify::{Notification, Notifier};
use crate::profile::Participant;
use crate::ring::{build_ring, GameState, Kill, ParticipantId, Removal, RingError};
use crate::roster::{parse_roster, RosterError};
use crate::store::{GameStore, StoreError, Versioned};

/// Errors surfaced to callers of the request layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ring(#[from] RingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("no game named '{0}'")]
    GameNotFound(String),

    #[error("a game named '{0}' already exists")]
    GameExists(String),

    #[error("no participant with id '{0}'")]
    ParticipantNotFound(ParticipantId),

    #[error("admin credential rejected")]
    Unauthorized,
}

impl ServiceError {
    /// Stable snake_case tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Ring(e) => e.kind(),
            ServiceError::Store(_) => "store",
            ServiceError::Roster(_) => "roster",
            ServiceError::GameNotFound(_) | ServiceError::ParticipantNotFound(_) => "not_found",
            ServiceError::GameExists(_) => "exists",
            ServiceError::Unauthorized => "unauthorized",
        }
    }

    /// True for outcomes a caller may report as a harmless no-op.
    pub fn is_benign(&self) -> bool {
        matches!(self, ServiceError::Ring(e) if e.is_benign())
    }
}

/// Public status of one participant in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub kills: u32,
    pub is_alive: bool,
}

/// One leaderboard row, joined with the participant's profile if known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub id: ParticipantId,
    pub display_name: String,
    pub kills: u32,
    pub is_alive: bool,
}

/// Summary of a roster import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub game: String,
    pub imported: usize,
    pub skipped: usize,
}

pub struct Service<S, N> {
    store: S,
    notifier: N,
    rng: SmallRng,
    admin_secret: String,
}

impl<S: GameStore, N: Notifier> Service<S, N> {
    /// Creates a service seeded from entropy.
    pub fn new(store: S, notifier: N, admin_secret: impl Into<String>) -> Self {
        Self::with_rng(store, notifier, admin_secret, SmallRng::from_entropy())
    }

    /// Creates a service with a fixed RNG, for reproducible rings.
    pub fn with_rng(store: S, notifier: N, admin_secret: impl Into<String>, rng: SmallRng) -> Self {
        Service {
            store,
            notifier,
            rng,
            admin_secret: admin_secret.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn authorize(&self, secret: &str) -> Result<(), ServiceError> {
        if self.admin_secret.is_empty() || secret != self.admin_secret {
            warn!("rejected admin call with bad credential");
            return Err(ServiceError::Unauthorized);
        }
        Ok(())
    }

    /// Loads a game and checks its invariants before handing it out.
    fn load(&self, game: &str) -> Result<Versioned<GameState>, ServiceError> {
        let loaded = self
            .store
            .load_game(game)?
            .ok_or_else(|| ServiceError::GameNotFound(game.to_string()))?;
        if let Err(e) = loaded.value.check_invariants() {
            warn!(game, error = %e, "stored game failed validation");
            return Err(e.into());
        }
        Ok(loaded)
    }

    /// Delivers notifications. A failed delivery is logged; the saved
    /// change stands.
    fn send(&mut self, notifications: &[Notification]) {
        for n in notifications {
            if let Err(e) = self.notifier.notify(n) {
                warn!(error = %e, "notification not delivered");
            }
        }
    }

    fn target_notifications(state: &GameState) -> Vec<Notification> {
        state
            .successor
            .iter()
            .map(|(hunter, target)| Notification::NewTarget {
                game: state.name.clone(),
                participant: hunter.clone(),
                target: target.clone(),
            })
            .collect()
    }

    /// Creates a game over `ids` with a fresh random ring.
    pub fn create_game<I>(&mut self, game: &str, ids: I, secret: &str) -> Result<GameState, ServiceError>
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.authorize(secret)?;
        self.build_and_save(game, ids)
    }

    fn build_and_save<I>(&mut self, game: &str, ids: I) -> Result<GameState, ServiceError>
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        if self.store.load_game(game)?.is_some() {
            return Err(ServiceError::GameExists(game.to_string()));
        }
        let state = build_ring(game, ids, &mut self.rng)?;
        match self.store.save_game(&state, None) {
            Ok(_) => {}
            Err(StoreError::AlreadyExists(name)) => return Err(ServiceError::GameExists(name)),
            Err(e) => return Err(e.into()),
        }
        info!(game, players = state.alive.len(), "game created");
        let notes = Self::target_notifications(&state);
        self.send(&notes);
        Ok(state)
    }

    /// Adds a participant to a running game and reshuffles every target.
    pub fn add_participant(&mut self, game: &str, id: ParticipantId, secret: &str) -> Result<GameState, ServiceError> {
        self.authorize(secret)?;
        let Versioned { version, value: mut state } = self.load(game)?;
        state.reshuffle([id.clone()], &mut self.rng)?;
        self.store.save_game(&state, Some(version))?;
        info!(game, participant = %id, players = state.alive.len(), "participant added, ring reshuffled");
        let notes = Self::target_notifications(&state);
        self.send(&notes);
        Ok(state)
    }

    /// Credits `killer` with eliminating their current target.
    pub fn record_kill(&mut self, game: &str, killer: &ParticipantId, secret: &str) -> Result<Kill, ServiceError> {
        self.authorize(secret)?;
        let Versioned { version, value: mut state } = self.load(game)?;
        let kill = state.record_kill(killer)?;
        self.store.save_game(&state, Some(version))?;
        info!(
            game,
            killer = %kill.killer,
            victim = %kill.eliminated,
            next = %kill.new_target,
            alive = state.alive.len(),
            "kill recorded"
        );

        let mut notes = vec![Notification::Eliminated {
            game: game.to_string(),
            participant: kill.eliminated.clone(),
        }];
        // The last survivor targets themself; they only hear that they won.
        match state.winner() {
            Some(winner) => notes.push(Notification::Winner {
                game: game.to_string(),
                participant: winner.clone(),
            }),
            None => notes.push(Notification::NewTarget {
                game: game.to_string(),
                participant: kill.killer.clone(),
                target: kill.new_target.clone(),
            }),
        }
        self.send(&notes);
        Ok(kill)
    }

    /// Removes a participant without crediting anyone. Returns `None` if
    /// they were not alive; nothing is saved in that case.
    pub fn remove_participant(
        &mut self,
        game: &str,
        id: &ParticipantId,
        secret: &str,
    ) -> Result<Option<Removal>, ServiceError> {
        self.authorize(secret)?;
        let Versioned { version, value: mut state } = self.load(game)?;
        let Some(removal) = state.remove_participant(id)? else {
            debug!(game, participant = %id, "remove: participant not alive, nothing to do");
            return Ok(None);
        };
        self.store.save_game(&state, Some(version))?;
        info!(game, removed = %removal.removed, predecessor = %removal.predecessor, "participant removed");

        let mut notes = vec![Notification::Removed {
            game: game.to_string(),
            participant: removal.removed.clone(),
        }];
        if state.is_alive(&removal.predecessor) {
            notes.push(Notification::NewTarget {
                game: game.to_string(),
                participant: removal.predecessor.clone(),
                target: removal.new_target.clone(),
            });
        }
        self.send(&notes);
        Ok(Some(removal))
    }

    /// Kill count and alive flag for everyone who has been in the game.
    pub fn game_stats(&self, game: &str) -> Result<BTreeMap<ParticipantId, PlayerStatus>, ServiceError> {
        let state = self.load(game)?.value;
        Ok(state
            .kill_counts
            .iter()
            .map(|(id, &kills)| {
                let status = PlayerStatus {
                    kills,
                    is_alive: state.is_alive(id),
                };
                (id.clone(), status)
            })
            .collect())
    }

    /// Participants sorted by kills (descending), then id.
    pub fn leaderboard(&self, game: &str) -> Result<Vec<LeaderboardRow>, ServiceError> {
        let mut rows = Vec::new();
        for (id, status) in self.game_stats(game)? {
            let display_name = match self.store.load_participant(&id)? {
                Some(p) => p.full_display_name,
                None => id.to_string(),
            };
            rows.push(LeaderboardRow {
                id,
                display_name,
                kills: status.kills,
                is_alive: status.is_alive,
            });
        }
        rows.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    /// The full game record.
    pub fn game(&self, game: &str) -> Result<GameState, ServiceError> {
        Ok(self.load(game)?.value)
    }

    /// Looks up a participant profile.
    pub fn participant(&self, id: &ParticipantId) -> Result<Participant, ServiceError> {
        self.store
            .load_participant(id)?
            .ok_or_else(|| ServiceError::ParticipantNotFound(id.clone()))
    }

    /// Creates `game` over every valid roster row, then stores their
    /// profiles. Nothing is written if the game cannot be created.
    pub fn import_roster<R: BufRead>(
        &mut self,
        game: &str,
        reader: R,
        secret: &str,
    ) -> Result<ImportReport, ServiceError> {
        self.authorize(secret)?;
        if self.store.load_game(game)?.is_some() {
            return Err(ServiceError::GameExists(game.to_string()));
        }
        let roster = parse_roster(reader)?;
        if roster.skipped > 0 {
            warn!(game, skipped = roster.skipped, "roster rows without id or name were skipped");
        }
        let ids: Vec<ParticipantId> = roster.participants.iter().map(|p| p.id.clone()).collect();
        let state = self.build_and_save(game, ids)?;
        for participant in &roster.participants {
            self.store.save_participant(participant)?;
        }
        Ok(ImportReport {
            game: game.to_string(),
            imported: state.alive.len(),
            skipped: roster.skipped,
        })
    }
}

/// A `Service` behind a mutex, for callers on several threads.
///
/// The lock is held across each load-mutate-save cycle.
pub struct SharedService<S, N> {
    inner: Mutex<Service<S, N>>,
}

impl<S: GameStore, N: Notifier> SharedService<S, N> {
    pub fn new(service: Service<S, N>) -> Self {
        SharedService {
            inner: Mutex::new(service),
        }
    }

    /// Runs `f` with exclusive access to the service.
    pub fn with<T>(&self, f: impl FnOnce(&mut Service<S, N>) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn into_inner(self) -> Service<S, N> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
