//! Storage abstraction for game and participant records.
//!
//! The ring engine never touches storage; the request layer loads a game,
//! runs one engine operation and saves the result through `GameStore`.
//! Every saved game carries a version that is checked on save, so two
//! writers racing on the same game cannot silently overwrite each other.

pub mod json_dir;
pub mod memory;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use crate::profile::Participant;
use crate::ring::{GameState, ParticipantId};

/// Errors raised by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("game '{name}' was modified concurrently (expected version {expected}, found {found})")]
    Conflict { name: String, expected: u64, found: u64 },

    #[error("game '{0}' already exists")]
    AlreadyExists(String),

    #[error("game '{0}' does not exist")]
    Missing(String),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// A loaded record together with the version it was saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Load/save access to persisted games and participant profiles.
pub trait GameStore {
    /// Loads a game by name.
    fn load_game(&self, name: &str) -> Result<Option<Versioned<GameState>>, StoreError>;

    /// Saves a game and returns its new version.
    ///
    /// `expected_version = None` creates the game and fails if it exists.
    /// `Some(v)` overwrites only if the stored version is still `v`.
    fn save_game(&mut self, game: &GameState, expected_version: Option<u64>) -> Result<u64, StoreError>;

    /// Names of all stored games.
    fn game_names(&self) -> Result<Vec<String>, StoreError>;

    /// Loads a participant profile.
    fn load_participant(&self, id: &ParticipantId) -> Result<Option<Participant>, StoreError>;

    /// Creates or replaces a participant profile.
    fn save_participant(&mut self, participant: &Participant) -> Result<(), StoreError>;
}

/// Shared version check for store implementations.
pub(crate) fn check_version(
    name: &str,
    current: Option<u64>,
    expected: Option<u64>,
) -> Result<u64, StoreError> {
    match (current, expected) {
        (None, None) => Ok(1),
        (Some(_), None) => Err(StoreError::AlreadyExists(name.to_string())),
        (None, Some(_)) => Err(StoreError::Missing(name.to_string())),
        (Some(found), Some(expected)) if found == expected => Ok(found + 1),
        (Some(found), Some(expected)) => Err(StoreError::Conflict {
            name: name.to_string(),
            expected,
            found,
        }),
    }
}
