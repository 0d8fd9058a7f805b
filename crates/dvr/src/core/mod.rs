//! Core-side analysis.
//!
//! Everything that observes the host core's instruction stream lives here.
//! Currently that is the taint tracker, which extracts dependency chains
//! between stride loads and indirect loads.

/// Taint tracking, dependency chains and the compute-step ledger.
pub mod taint;

pub use self::taint::{Propagation, TaintScoreboard};
