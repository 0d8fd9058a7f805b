//! # Unit Components
//!
//! Tests for each building block of the scoreboard: instruction
//! classification, taint propagation, chains, the ledger, configuration,
//! statistics and trace playback.

/// Configuration parsing and defaults.
pub mod config;


/// Instruction classification and disassembly.
///
/// This module aggregates tests for:
/// - Operation category selection for every tracked idiom.
/// - Field extraction through the classifier.
/// - Mnemonics printed in chain diagnostics.
pub mod isa;

/// Trace parsing and playback.
pub mod sim;

/// Statistics counters and report rendering.
pub mod stats;
