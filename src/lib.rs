//! Assassin game library.
//!
//! Exposes the target ring engine, participant profiles, storage, the
//! request-layer service, and the line protocol used by the binaries.

pub mod config;
pub mod notify;
pub mod profile;
pub mod protocol;
pub mod ring;
pub mod roster;
pub mod server;
pub mod service;
pub mod simulate;
pub mod store;
