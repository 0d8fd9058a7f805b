//! Taint tracking and dependency chain extraction.
//!
//! This module follows a value loaded by a stride load through the renamed
//! register file until it forms the address of a later load. It provides:
//! 1. **Host Interfaces:** `CoreController` and `DynInst`, implemented by the host core.
//! 2. **Scoreboard:** `TaintScoreboard`, the per-instruction taint state machine.
//! 3. **Chains:** The session under construction and the store of completed chains.
//! 4. **Ledger:** Compute steps recorded along each chain and their replay.
//! 5. **Branches:** Prediction queries for direct control transfers.

/// Branch inspection helpers.
pub mod branch;

/// Completed dependency chains.
pub mod chain;

/// Compute-step ledger and replay.
pub mod ledger;

/// Taint state machine.
pub mod scoreboard;

/// The active tracking session.
pub mod session;

/// Capabilities the host core lends the scoreboard.
pub mod traits;

pub use branch::{branch_operand, check_branch};
pub use chain::{ChainStore, DependencyChain};
pub use ledger::{ChainLedger, ComputeLedger, ComputeStep, StepOp};
pub use scoreboard::{Propagation, TaintScoreboard};
pub use session::TaintSession;
pub use traits::{CoreController, DynInst};
