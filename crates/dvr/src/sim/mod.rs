//! Trace-driven simulation.
//!
//! Provides a JSON instruction trace format, a core controller that answers
//! from it, and a runner that plays the trace through the taint scoreboard.

/// Trace runner and run summary.
pub mod runner;

/// Trace format and trace-backed host.
pub mod trace;

pub use runner::{LedgerReport, RunSummary, TraceRunner};
pub use trace::{Trace, TraceHost, TraceInst};
