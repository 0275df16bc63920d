//! Line protocol handling.
//!
//! Commands arrive one per line on stdin; each produces one response line
//! on stdout. This module holds the command parser used by the main loop.

pub mod parser;

pub use parser::{parse_command, Command};
