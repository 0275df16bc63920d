//! Ring mutation: credited eliminations and administrative removals.
//!
//! Both operations shrink the cycle by one participant and splice the
//! removed participant's target into the pointer that used to reach them.

use serde::Serialize;

use super::error::RingError;
use super::participant::ParticipantId;
use super::state::GameState;

/// Outcome of a credited elimination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kill {
    pub killer: ParticipantId,
    pub eliminated: ParticipantId,
    /// The killer's target after the elimination.
    pub new_target: ParticipantId,
}

/// Outcome of an administrative removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Removal {
    pub removed: ParticipantId,
    /// The participant who was targeting `removed`.
    pub predecessor: ParticipantId,
    /// The predecessor's target after the removal.
    pub new_target: ParticipantId,
    /// Administrative removals never award kill credit.
    pub credited: bool,
}

impl GameState {
    fn successor_or_corrupt(&self, id: &ParticipantId) -> Result<ParticipantId, RingError> {
        self.successor
            .get(id)
            .cloned()
            .ok_or_else(|| RingError::CorruptState(format!("alive participant '{id}' has no target")))
    }

    /// Finds the unique participant whose target is `target`.
    fn unique_predecessor(&self, target: &ParticipantId) -> Result<ParticipantId, RingError> {
        let mut hunters = self
            .successor
            .iter()
            .filter(|(_, t)| *t == target)
            .map(|(hunter, _)| hunter);
        match (hunters.next(), hunters.next()) {
            (Some(hunter), None) => Ok(hunter.clone()),
            (None, _) => Err(RingError::CorruptState(format!(
                "nobody is targeting alive participant '{target}'"
            ))),
            (Some(_), Some(_)) => Err(RingError::CorruptState(format!(
                "more than one participant is targeting '{target}'"
            ))),
        }
    }

    /// Moves `id` from the alive roster to the dead roster and drops its
    /// successor entry.
    fn bury(&mut self, id: &ParticipantId) {
        self.alive.retain(|a| a != id);
        self.successor.remove(id);
        self.dead.push(id.clone());
    }

    /// Records that `killer` eliminated their current target.
    ///
    /// The killer inherits the victim's target and gains one kill. Fails
    /// with `GameOver` when the killer is the last one standing.
    pub fn record_kill(&mut self, killer: &ParticipantId) -> Result<Kill, RingError> {
        if !self.alive.contains(killer) {
            return Err(RingError::NotAlive(killer.clone()));
        }
        if self.alive.len() == 1 {
            return Err(RingError::GameOver(killer.clone()));
        }

        let victim = self.successor_or_corrupt(killer)?;
        if &victim == killer {
            return Err(RingError::CorruptState(format!(
                "'{killer}' targets themself with {} participants alive",
                self.alive.len()
            )));
        }
        let new_target = self.successor_or_corrupt(&victim)?;
        if !self.kill_counts.contains_key(killer) {
            return Err(RingError::CorruptState(format!("'{killer}' has no kill count")));
        }

        self.bury(&victim);
        self.successor.insert(killer.clone(), new_target.clone());
        if let Some(count) = self.kill_counts.get_mut(killer) {
            *count += 1;
        }

        Ok(Kill {
            killer: killer.clone(),
            eliminated: victim,
            new_target,
        })
    }

    /// Removes `target` from the game without crediting anyone.
    ///
    /// Returns `Ok(None)` and leaves the state untouched if `target` is not
    /// alive. Kill counts are never changed.
    pub fn remove_participant(&mut self, target: &ParticipantId) -> Result<Option<Removal>, RingError> {
        if !self.alive.contains(target) {
            return Ok(None);
        }

        let next = self.successor_or_corrupt(target)?;
        let predecessor = self.unique_predecessor(target)?;
        // A lone survivor is their own predecessor; removing them empties the ring.
        let new_target = if next == *target { predecessor.clone() } else { next };

        self.bury(target);
        if predecessor != *target {
            self.successor.insert(predecessor.clone(), new_target.clone());
        }

        Ok(Some(Removal {
            removed: target.clone(),
            predecessor,
            new_target,
            credited: false,
        }))
    }
}
