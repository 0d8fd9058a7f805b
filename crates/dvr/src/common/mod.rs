//! Common types shared by every part of the scoreboard.
//!
//! This module provides the fundamental building blocks used across the crate:
//! 1. **Register Identity:** Renamed physical register identifiers and their classes.
//! 2. **Error Handling:** Seed rejection, configuration and trace errors.

/// Error types (seed rejection, configuration, traces).
pub mod error;

/// Physical register identifiers.
pub mod reg;

pub use error::{ConfigError, TaintError, TraceError};
pub use reg::{PhysRegId, RegClass};
