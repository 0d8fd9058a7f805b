//! Dependency chain extraction for vectorising indirect loads.
//!
//! This crate watches the renamed instruction stream of an out-of-order core and
//! discovers the index computation that links a strided load to a later
//! indirect (gather) load. It provides:
//! 1. **ISA:** RV64I field extraction, the operation classifier and a small disassembler.
//! 2. **Taint:** A per-physical-register taint scoreboard with a single tracking session.
//! 3. **Chains:** The store of completed chains, one per stride load.
//! 4. **Ledger:** The compute steps along each chain and their replay from a new seed.
//! 5. **Simulation:** A JSON trace format and a runner, configuration and statistics.
//!
//! # Examples
//!
//! ```
//! use dvr_core::{PhysRegId, TaintScoreboard, Trace};
//!
//! let trace = Trace::from_json(r#"{
//!     "stride_pcs": ["0x1000"],
//!     "instructions": [
//!         { "pc": "0x1004", "inst": "0x00229313", "srcs": [5], "dests": [6] },
//!         { "pc": "0x1008", "inst": "0x00833383", "srcs": [6], "dests": [7] }
//!     ]
//! }"#).unwrap();
//! let host = dvr_core::sim::TraceHost::new(&trace);
//!
//! let mut scoreboard = TaintScoreboard::new(64);
//! scoreboard.seed_taint_with_value(&host, PhysRegId::int(5), 0x1000, 16).unwrap();
//! for inst in &trace.instructions {
//!     let _ = scoreboard.propagate(inst);
//! }
//!
//! assert_eq!(scoreboard.completed_chains().len(), 1);
//! assert_eq!(scoreboard.recompute(0x1000, 100), Some(100 * 4 + 8));
//! ```

/// Common types (physical registers, errors).
pub mod common;
/// Scoreboard configuration (defaults, record trigger).
pub mod config;
/// Taint tracking and dependency chain extraction.
pub mod core;
/// Instruction set (field extraction, decode, classification, disassembly).
pub mod isa;
/// Trace format and trace runner.
pub mod sim;
/// Scoreboard statistics collection and reporting.
pub mod stats;

/// Register identifier used in every taint query.
pub use crate::common::{PhysRegId, RegClass};
/// Root configuration type; use `Config::default()` or parse it from JSON.
pub use crate::config::Config;
/// Host capabilities and the scoreboard itself.
pub use crate::core::taint::{
    ComputeStep, CoreController, DependencyChain, DynInst, Propagation, TaintScoreboard,
};
/// Trace playback.
pub use crate::sim::{RunSummary, Trace, TraceRunner};
/// Scoreboard statistics.
pub use crate::stats::TaintStats;
