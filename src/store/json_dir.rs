//! Directory-backed store: one pretty-printed JSON file per record.
//!
//! Layout: `<root>/games/<name>.json` and `<root>/players/<id>.json`.
//! Files are written to a temporary sibling and renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{check_version, GameStore, StoreError, Versioned};
use crate::profile::Participant;
use crate::ring::{GameState, ParticipantId};

const GAMES_DIR: &str = "games";
const PLAYERS_DIR: &str = "players";

#[derive(Serialize)]
struct GameFileRef<'a> {
    version: u64,
    game: &'a GameState,
}

#[derive(Deserialize)]
struct GameFile {
    version: u64,
    game: GameState,
}

#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(root.join(GAMES_DIR))?;
        fs::create_dir_all(root.join(PLAYERS_DIR))?;
        Ok(JsonDirStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, dir: &str, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
            || key.chars().any(char::is_control)
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(dir).join(format!("{key}.json")))
    }

    fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl GameStore for JsonDirStore {
    fn load_game(&self, name: &str) -> Result<Option<Versioned<GameState>>, StoreError> {
        let path = self.record_path(GAMES_DIR, name)?;
        let Some(text) = Self::read_optional(&path)? else {
            return Ok(None);
        };
        let file: GameFile = serde_json::from_str(&text)?;
        Ok(Some(Versioned {
            version: file.version,
            value: file.game,
        }))
    }

    fn save_game(&mut self, game: &GameState, expected_version: Option<u64>) -> Result<u64, StoreError> {
        let path = self.record_path(GAMES_DIR, &game.name)?;
        let current = self.load_game(&game.name)?.map(|g| g.version);
        let version = check_version(&game.name, current, expected_version)?;
        let text = serde_json::to_string_pretty(&GameFileRef { version, game })?;
        Self::write_atomic(&path, &text)?;
        Ok(version)
    }

    fn game_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root.join(GAMES_DIR))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load_participant(&self, id: &ParticipantId) -> Result<Option<Participant>, StoreError> {
        let path = self.record_path(PLAYERS_DIR, id.as_str())?;
        match Self::read_optional(&path)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn save_participant(&mut self, participant: &Participant) -> Result<(), StoreError> {
        let path = self.record_path(PLAYERS_DIR, participant.id.as_str())?;
        let text = serde_json::to_string_pretty(participant)?;
        Self::write_atomic(&path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::build_ring;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn game(name: &str) -> GameState {
        let ids = ["a", "b", "c", "d"].map(|s| ParticipantId::new(s).unwrap());
        build_ring(name, ids, &mut SmallRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn games_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        let mut g = game("ivy");
        assert_eq!(store.save_game(&g, None).unwrap(), 1);
        g.record_kill(&g.alive[0].clone()).unwrap();
        assert_eq!(store.save_game(&g, Some(1)).unwrap(), 2);

        let reopened = JsonDirStore::open(dir.path()).unwrap();
        let loaded = reopened.load_game("ivy").unwrap().unwrap();
        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.value, g);
        assert_eq!(reopened.game_names().unwrap(), vec!["ivy".to_string()]);
    }

    #[test]
    fn duplicate_create_and_stale_write_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        let g = game("ivy");
        store.save_game(&g, None).unwrap();
        assert!(matches!(
            store.save_game(&g, None),
            Err(StoreError::AlreadyExists(_))
        ));
        store.save_game(&g, Some(1)).unwrap();
        assert!(matches!(
            store.save_game(&g, Some(1)),
            Err(StoreError::Conflict { .. })
        ));
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        for key in ["../escape", ".hidden", "a/b", ""] {
            assert!(matches!(
                store.load_game(key),
                Err(StoreError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn missing_records_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        assert!(store.load_game("nothing").unwrap().is_none());
        assert!(store
            .load_participant(&ParticipantId::new("ghost").unwrap())
            .unwrap()
            .is_none());
    }

    #[test]
    fn participants_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        let p = Participant::new(ParticipantId::new("pm12").unwrap(), "Pierce Maloney", Some("Killa"), "");
        store.save_participant(&p).unwrap();
        assert_eq!(store.load_participant(&p.id).unwrap(), Some(p));
    }
}
