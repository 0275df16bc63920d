//! Errors reported by the target ring engine.

use super::participant::ParticipantId;

/// Failure kinds of the ring engine.
///
/// A failing operation never mutates the state it was called on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("participant '{0}' is not alive")]
    NotAlive(ParticipantId),

    #[error("participant '{0}' is already part of the game")]
    AlreadyPresent(ParticipantId),

    #[error("game over: only '{0}' remains")]
    GameOver(ParticipantId),

    #[error("corrupt game state: {0}")]
    CorruptState(String),
}

impl RingError {
    /// Stable snake_case tag used on the wire.
    pub const fn kind(&self) -> &'static str {
        match self {
            RingError::InvalidArgument(_) => "invalid_argument",
            RingError::NotAlive(_) => "not_alive",
            RingError::AlreadyPresent(_) => "already_present",
            RingError::GameOver(_) => "game_over",
            RingError::CorruptState(_) => "corrupt_state",
        }
    }

    /// True for errors a caller may treat as a harmless no-op.
    pub const fn is_benign(&self) -> bool {
        matches!(self, RingError::NotAlive(_) | RingError::AlreadyPresent(_))
    }
}
