//! Error types for the taint scoreboard and its surroundings.
//!
//! Nothing in the scoreboard is fatal to the host simulation. It provides:
//! 1. **Seed Rejection:** `TaintError` explains why a seed request changed no state.
//! 2. **Configuration:** `ConfigError` for malformed JSON configuration.
//! 3. **Traces:** `TraceError` for trace files that cannot be read or parsed.
//!
//! Stale sessions and unrecognised operations are not errors; they are reported
//! through [`Propagation`](crate::core::taint::Propagation) instead.

use thiserror::Error;

/// Reasons a seed request is rejected.
///
/// A rejected seed leaves the taint table, the shadow values and the active
/// session exactly as they were.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TaintError {
    /// The destination register lies outside the taint table.
    #[error("physical register {index} is outside the taint table (capacity {capacity})")]
    InvalidRegister {
        /// Offending physical register index.
        index: usize,
        /// Number of entries in the taint table.
        capacity: usize,
    },

    /// The host does not recognise the PC as a strided base access.
    #[error("pc {0:#x} is not a stride load")]
    NonStridePc(u64),
}

/// Errors raised while loading a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON document does not match the configuration schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while loading or playing an instruction trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("cannot read trace: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON document does not match the trace schema.
    #[error("invalid trace: {0}")]
    Parse(#[from] serde_json::Error),

    /// An address in the trace is not a valid hex or decimal number.
    #[error("bad address {0:?}")]
    BadAddress(String),

    /// An instruction word in the trace is not a valid 32-bit hex or decimal number.
    #[error("instruction at pc {pc:#x}: bad encoding {text:?}")]
    BadEncoding {
        /// PC of the offending trace entry.
        pc: u64,
        /// The text that failed to parse.
        text: String,
    },
}
