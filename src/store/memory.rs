//! In-memory store for tests and for running without a data directory.

use std::collections::HashMap;

use super::{check_version, GameStore, StoreError, Versioned};
use crate::profile::Participant;
use crate::ring::{GameState, ParticipantId};

#[derive(Debug, Default)]
pub struct MemoryStore {
    games: HashMap<String, Versioned<GameState>>,
    participants: HashMap<ParticipantId, Participant>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn load_game(&self, name: &str) -> Result<Option<Versioned<GameState>>, StoreError> {
        Ok(self.games.get(name).cloned())
    }

    fn save_game(&mut self, game: &GameState, expected_version: Option<u64>) -> Result<u64, StoreError> {
        let current = self.games.get(&game.name).map(|g| g.version);
        let version = check_version(&game.name, current, expected_version)?;
        self.games.insert(
            game.name.clone(),
            Versioned {
                version,
                value: game.clone(),
            },
        );
        Ok(version)
    }

    fn game_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.games.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn load_participant(&self, id: &ParticipantId) -> Result<Option<Participant>, StoreError> {
        Ok(self.participants.get(id).cloned())
    }

    fn save_participant(&mut self, participant: &Participant) -> Result<(), StoreError> {
        self.participants
            .insert(participant.id.clone(), participant.clone());
        Ok(())
    }
}
