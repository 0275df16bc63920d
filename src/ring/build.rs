//! Ring construction.
//!
//! Builds the initial target cycle for a new game and rebuilds it from
//! scratch when participants join a running game.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::RingError;
use super::participant::ParticipantId;
use super::state::GameState;

/// Shuffles `ids` uniformly and links each entry to the next one, wrapping
/// around at the end. `ids` must be non-empty.
fn link_ring(
    ids: &mut [ParticipantId],
    rng: &mut impl Rng,
) -> BTreeMap<ParticipantId, ParticipantId> {
    ids.shuffle(rng);
    let n = ids.len();
    (0..n)
        .map(|i| (ids[i].clone(), ids[(i + 1) % n].clone()))
        .collect()
}

/// Collapses duplicates and rejects an empty participant set.
fn dedup_non_empty<I>(ids: I) -> Result<Vec<ParticipantId>, RingError>
where
    I: IntoIterator<Item = ParticipantId>,
{
    let unique: BTreeSet<ParticipantId> = ids.into_iter().collect();
    if unique.is_empty() {
        return Err(RingError::InvalidArgument(
            "cannot build a ring from an empty participant set".to_string(),
        ));
    }
    Ok(unique.into_iter().collect())
}

/// Creates a new game whose alive participants form one random cycle.
pub fn build_ring<I>(name: &str, ids: I, rng: &mut impl Rng) -> Result<GameState, RingError>
where
    I: IntoIterator<Item = ParticipantId>,
{
    if name.trim().is_empty() {
        return Err(RingError::InvalidArgument("game name must not be empty".to_string()));
    }
    let mut alive = dedup_non_empty(ids)?;
    let successor = link_ring(&mut alive, rng);
    let kill_counts = alive.iter().map(|id| (id.clone(), 0)).collect();

    Ok(GameState {
        name: name.to_string(),
        kill_counts,
        successor,
        alive,
        dead: Vec::new(),
    })
}

impl GameState {
    /// Adds `new_ids` to a running game and re-permutes the whole alive set.
    ///
    /// Every alive participant's target may change. Ids that were ever part
    /// of the game are rejected with `AlreadyPresent` and nothing changes.
    pub fn reshuffle<I>(&mut self, new_ids: I, rng: &mut impl Rng) -> Result<(), RingError>
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        let new_ids = dedup_non_empty(new_ids)?;
        if let Some(known) = new_ids.iter().find(|id| self.contains(id)) {
            return Err(RingError::AlreadyPresent(known.clone()));
        }

        let mut alive = self.alive.clone();
        alive.extend(new_ids.iter().cloned());
        let successor = link_ring(&mut alive, rng);

        for id in new_ids {
            self.kill_counts.insert(id, 0);
        }
        self.alive = alive;
        self.successor = successor;
        Ok(())
    }
}
