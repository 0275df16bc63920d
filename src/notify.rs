//! Outbound notifications.
//!
//! The request layer describes who needs to hear about a ring change;
//! delivery (email or otherwise) is up to the `Notifier` implementation.

use serde::Serialize;
use tracing::info;

use crate::ring::ParticipantId;

/// A message for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// The participant was eliminated by their hunter.
    Eliminated { game: String, participant: ParticipantId },
    /// The participant was removed by an administrator.
    Removed { game: String, participant: ParticipantId },
    /// The participant has a new target.
    NewTarget {
        game: String,
        participant: ParticipantId,
        target: ParticipantId,
    },
    /// The participant is the last one standing.
    Winner { game: String, participant: ParticipantId },
}

impl Notification {
    /// The participant this notification is addressed to.
    pub fn recipient(&self) -> &ParticipantId {
        match self {
            Notification::Eliminated { participant, .. }
            | Notification::Removed { participant, .. }
            | Notification::NewTarget { participant, .. }
            | Notification::Winner { participant, .. } => participant,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to notify '{recipient}': {reason}")]
pub struct NotifyError {
    pub recipient: ParticipantId,
    pub reason: String,
}

/// Delivers notifications to participants.
pub trait Notifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes each notification to the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        match notification {
            Notification::Eliminated { game, participant } => {
                info!(game = %game, participant = %participant, "notify: you have been slain");
            }
            Notification::Removed { game, participant } => {
                info!(game = %game, participant = %participant, "notify: you have been removed from the game");
            }
            Notification::NewTarget {
                game,
                participant,
                target,
            } => {
                info!(game = %game, participant = %participant, target = %target, "notify: new target");
            }
            Notification::Winner { game, participant } => {
                info!(game = %game, participant = %participant, "notify: last one standing");
            }
        }
        Ok(())
    }
}

/// Keeps every notification in memory. Useful for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub sent: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.push(notification.clone());
        Ok(())
    }
}
