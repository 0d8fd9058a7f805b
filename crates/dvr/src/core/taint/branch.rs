//! Branch inspection.
//!
//! Auxiliary queries an optimizer makes about direct control transfers while a
//! chain is being tracked. They read the front end's prediction and never touch
//! taint state.

use tracing::trace;

use crate::core::taint::traits::DynInst;

/// Returns the predicted target of a direct control transfer predicted taken.
///
/// Returns `None` for non-branches, branches predicted not taken, and branches
/// whose target was never recorded.
pub fn check_branch(inst: &dyn DynInst) -> Option<u64> {
    if !inst.is_direct_ctrl() {
        return None;
    }

    let pc = inst.pc();
    if !inst.pred_taken() {
        trace!(pc = format_args!("{pc:#x}"), "DVR: branch predicted not taken");
        return None;
    }

    let target = inst.pred_target()?;
    trace!(
        pc = format_args!("{pc:#x}"),
        target = format_args!("{target:#x}"),
        "DVR: branch predicted taken"
    );
    Some(target)
}

/// Reads operand `idx` of a direct control transfer (the values it compares).
///
/// Returns `None` for anything that is not a direct control transfer or when
/// the host cannot supply the operand.
pub fn branch_operand(inst: &dyn DynInst, idx: usize) -> Option<u64> {
    if !inst.is_direct_ctrl() || idx >= inst.src_regs().len() {
        return None;
    }
    inst.src_operand(idx)
}
