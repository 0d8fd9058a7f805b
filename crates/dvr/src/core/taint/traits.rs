//! Host Core Interfaces.
//!
//! The scoreboard observes an out-of-order core without owning any of it. This
//! module defines the two capabilities the core lends it:
//! 1. **Core Controller:** Policy queries about stride loads and vectorised load values.
//! 2. **Dynamic Instruction:** A read-only view of one renamed, in-flight instruction.

use crate::common::reg::PhysRegId;

/// Policy queries the scoreboard makes of the host core.
///
/// Passed by reference to the scoreboard calls that need it rather than held,
/// so a host that owns the scoreboard can also be its controller.
pub trait CoreController {
    /// Returns `true` if `pc` is a load already known to follow a regular stride.
    fn is_stride_pc(&self, pc: u64) -> bool;

    /// Returns the most recent vectorised load value, if the host has one.
    fn latest_vector_load_value(&self) -> Option<u64>;

    /// Returns the detected stride of the load at `pc` (diagnostic only).
    fn stride_value(&self, pc: u64) -> i64;
}

/// Read-only view of an in-flight instruction after register renaming.
pub trait DynInst {
    /// Address of the instruction.
    fn pc(&self) -> u64;

    /// Raw 32-bit instruction encoding.
    fn raw_inst(&self) -> u32;

    /// Renamed source registers, in operand order.
    fn src_regs(&self) -> &[PhysRegId];

    /// Renamed destination registers; the first one receives propagated taint.
    fn dest_regs(&self) -> &[PhysRegId];

    /// Returns `true` if the instruction is a memory load.
    fn is_load(&self) -> bool;

    /// Returns `true` if the instruction is a direct control transfer.
    fn is_direct_ctrl(&self) -> bool;

    /// Returns `true` if the branch predictor predicted this instruction taken.
    fn pred_taken(&self) -> bool {
        false
    }

    /// Predicted target address, if the front end recorded one.
    fn pred_target(&self) -> Option<u64> {
        None
    }

    /// Current value of source operand `idx`, if the host can read it.
    fn src_operand(&self, idx: usize) -> Option<u64>;
}
