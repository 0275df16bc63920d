//! Target ring engine.
//!
//! Keeps every alive participant pointed at exactly one other alive
//! participant so that the pointers form a single cycle. Contains the
//! game-state record, ring construction, and the two removal operations.
//! Everything here is synchronous and performs no I/O.

pub mod build;
pub mod error;
pub mod mutate;
pub mod participant;
pub mod state;

pub use build::build_ring;
pub use error::RingError;
pub use mutate::{Kill, Removal};
pub use participant::ParticipantId;
pub use state::GameState;
