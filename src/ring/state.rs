//! Game state representation.
//!
//! Holds the full record of one game: every participant's kill count, the
//! successor (target) pointer of each alive participant, and the alive and
//! dead rosters. The successor pointers of the alive participants always
//! form a single cycle.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::RingError;
use super::participant::ParticipantId;

/// Complete state of a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub name: String,
    /// One entry per participant who has ever been in the game.
    pub kill_counts: BTreeMap<ParticipantId, u32>,
    /// Target of each alive participant. Defined only for alive participants.
    pub successor: BTreeMap<ParticipantId, ParticipantId>,
    /// Alive participants in the order of the last shuffle.
    pub alive: Vec<ParticipantId>,
    /// Eliminated participants, in elimination order.
    pub dead: Vec<ParticipantId>,
}

impl GameState {
    /// Returns true if `id` is currently alive.
    pub fn is_alive(&self, id: &ParticipantId) -> bool {
        self.successor.contains_key(id)
    }

    /// Returns true if `id` has ever been part of this game.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.kill_counts.contains_key(id)
    }

    /// The current target of `id`, if alive.
    pub fn target_of(&self, id: &ParticipantId) -> Option<&ParticipantId> {
        self.successor.get(id)
    }

    /// The participant currently targeting `id`, if `id` is alive and the
    /// ring has exactly one such participant.
    pub fn hunter_of(&self, id: &ParticipantId) -> Option<&ParticipantId> {
        let mut hunters = self
            .successor
            .iter()
            .filter(|(_, target)| *target == id)
            .map(|(hunter, _)| hunter);
        match (hunters.next(), hunters.next()) {
            (Some(h), None) => Some(h),
            _ => None,
        }
    }

    /// Kill count of `id` (0 for unknown participants).
    pub fn kills(&self, id: &ParticipantId) -> u32 {
        self.kill_counts.get(id).copied().unwrap_or(0)
    }

    /// The sole remaining participant once the game is down to one.
    pub fn winner(&self) -> Option<&ParticipantId> {
        match self.alive.as_slice() {
            [last] => Some(last),
            _ => None,
        }
    }

    /// Alive participants in target order, starting from the first entry
    /// of `alive`. Stops at the first revisited or missing pointer.
    pub fn cycle_order(&self) -> Vec<ParticipantId> {
        let mut order = Vec::with_capacity(self.alive.len());
        let mut seen = BTreeSet::new();
        let Some(mut current) = self.alive.first() else {
            return order;
        };
        while seen.insert(current) {
            order.push(current.clone());
            match self.successor.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        order
    }

    /// Verifies the structural invariants of the record.
    ///
    /// Returns `CorruptState` describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), RingError> {
        let corrupt = |msg: String| Err(RingError::CorruptState(msg));

        let mut alive_set = BTreeSet::new();
        for id in &self.alive {
            if !alive_set.insert(id) {
                return corrupt(format!("'{id}' appears twice in the alive list"));
            }
        }

        let successor_keys: BTreeSet<&ParticipantId> = self.successor.keys().collect();
        if successor_keys != alive_set {
            return corrupt("alive list and successor keys differ".to_string());
        }

        let mut dead_set = BTreeSet::new();
        for id in &self.dead {
            if alive_set.contains(id) {
                return corrupt(format!("'{id}' is both alive and dead"));
            }
            if !dead_set.insert(id) {
                return corrupt(format!("'{id}' appears twice in the dead list"));
            }
        }

        let everyone: BTreeSet<&ParticipantId> = alive_set.union(&dead_set).copied().collect();
        let known: BTreeSet<&ParticipantId> = self.kill_counts.keys().collect();
        if everyone != known {
            return corrupt("kill counts do not cover exactly the alive and dead participants".to_string());
        }

        for (hunter, target) in &self.successor {
            if !alive_set.contains(target) {
                return corrupt(format!("'{hunter}' targets '{target}' who is not alive"));
            }
        }

        let order = self.cycle_order();
        if order.len() != self.alive.len() {
            return corrupt("successor pointers do not form a single cycle".to_string());
        }
        if let (Some(first), Some(last)) = (order.first(), order.last()) {
            if self.successor.get(last) != Some(first) {
                return corrupt("successor pointers do not close the cycle".to_string());
            }
        }

        Ok(())
    }
}
