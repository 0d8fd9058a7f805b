//! Compute-Step Ledger and Replay Engine.
//!
//! Every recognised instruction along a chain transforms the value flowing from
//! the stride load towards the indirect load's address. The ledger records those
//! transformations so the final address can be rebuilt for a different seed
//! without re-executing anything:
//! 1. **Steps:** Shift-left by a constant, add an operand, add a load offset.
//! 2. **Positional Storage:** One ledger per base PC, ordered by each step's
//!    position in its chain, one step per instruction address.
//! 3. **Replay:** `recompute` folds the steps over a new seed and refreshes each
//!    step's input and output values.
//!
//! Arithmetic wraps at 64 bits and shift amounts are taken modulo 64.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::isa::classify::OpClass;

/// Arithmetic performed by one compute step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StepOp {
    /// Shift left by `operand` bits.
    Shift,
    /// Add `operand`, the value of the untainted source register.
    Add,
    /// Add `operand`, the load's immediate offset (two's complement).
    LoadOffset,
}

impl StepOp {
    /// Mnemonic used in logs and reports.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Shift => "slli",
            Self::Add => "add",
            Self::LoadOffset => "lw",
        }
    }
}

/// One recorded transformation along a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComputeStep {
    /// Address of the instruction that performed the step.
    pub pc: u64,
    /// Position of that instruction within its chain (the base is position 0).
    pub position: usize,
    /// Operation kind.
    pub op: StepOp,
    /// Shift amount, addend, or offset.
    pub operand: u64,
    /// Value entering the step during the most recent evaluation.
    pub input: u64,
    /// Value leaving the step during the most recent evaluation.
    pub output: u64,
    /// Human-readable description.
    pub description: String,
}

impl ComputeStep {
    /// Builds the step an instruction of category `class` performs.
    ///
    /// `addend` is only consulted for `OpClass::Add`. Returns `None` for
    /// `OpClass::Other`, which is never recorded.
    pub fn from_class(
        pc: u64,
        position: usize,
        class: OpClass,
        addend: u64,
        input: u64,
    ) -> Option<Self> {
        let (op, operand, description) = match class {
            OpClass::ShiftLeft { shamt } => (
                StepOp::Shift,
                u64::from(shamt),
                format!("Left shift by {shamt}"),
            ),
            OpClass::Add => (StepOp::Add, addend, "Add base and offset".to_string()),
            OpClass::Load { offset } => (
                StepOp::LoadOffset,
                offset as u64,
                format!("Load from memory: base {offset:+}"),
            ),
            OpClass::Other => return None,
        };

        let mut step = Self {
            pc,
            position,
            op,
            operand,
            input,
            output: 0,
            description,
        };
        step.output = step.apply(input);
        Some(step)
    }

    /// Applies this step to `value`.
    #[inline]
    pub const fn apply(&self, value: u64) -> u64 {
        match self.op {
            StepOp::Shift => value.wrapping_shl((self.operand & 0x3F) as u32),
            StepOp::Add | StepOp::LoadOffset => value.wrapping_add(self.operand),
        }
    }
}

impl fmt::Display for ComputeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operand = match self.op {
            StepOp::LoadOffset => format!("{:+}", self.operand as i64),
            StepOp::Shift => self.operand.to_string(),
            StepOp::Add => format!("{:#x}", self.operand),
        };
        write!(
            f,
            "[{}] pc={:#x} {} {}: {:#x} -> {:#x} ({})",
            self.position,
            self.pc,
            self.op.mnemonic(),
            operand,
            self.input,
            self.output,
            self.description
        )
    }
}

/// Ordered compute steps of one chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainLedger {
    steps: Vec<ComputeStep>,
}

impl ChainLedger {
    /// Inserts `step` at its chain position.
    ///
    /// Returns `false` and leaves the ledger unchanged if a step for the same
    /// instruction address, or for the same position, is already present.
    pub fn insert(&mut self, step: ComputeStep) -> bool {
        if self.contains_pc(step.pc) {
            return false;
        }
        match self.steps.binary_search_by_key(&step.position, |s| s.position) {
            Ok(_) => false,
            Err(idx) => {
                self.steps.insert(idx, step);
                true
            }
        }
    }

    /// Returns `true` if a step was recorded for `pc`.
    pub fn contains_pc(&self, pc: u64) -> bool {
        self.steps.iter().any(|s| s.pc == pc)
    }

    /// Recorded steps in chain order.
    pub fn steps(&self) -> &[ComputeStep] {
        &self.steps
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replays every step starting from `seed` and returns the final value.
    ///
    /// Each step's `input` and `output` are overwritten with the values of
    /// this replay.
    pub fn recompute(&mut self, seed: u64) -> u64 {
        let mut value = seed;
        for step in &mut self.steps {
            step.input = value;
            value = step.apply(value);
            step.output = value;
            debug!(
                pc = format_args!("{:#x}", step.pc),
                op = step.op.mnemonic(),
                operand = format_args!("{:#x}", step.operand),
                input = format_args!("{:#x}", step.input),
                output = format_args!("{:#x}", step.output),
                "DVR: recompute step"
            );
        }
        value
    }
}

/// Ledgers of every chain, keyed by base PC.
#[derive(Clone, Debug, Default)]
pub struct ComputeLedger {
    chains: HashMap<u64, ChainLedger>,
}

impl ComputeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a step into the ledger of `base_pc`, creating it if needed.
    ///
    /// Returns `false` if the step was a duplicate and was dropped.
    pub fn insert(&mut self, base_pc: u64, step: ComputeStep) -> bool {
        self.chains.entry(base_pc).or_default().insert(step)
    }

    /// Commits a batch of steps (typically staged by a session) to `base_pc`.
    ///
    /// Returns the number of steps actually inserted.
    pub fn commit(&mut self, base_pc: u64, steps: Vec<ComputeStep>) -> usize {
        let ledger = self.chains.entry(base_pc).or_default();
        steps.into_iter().filter_map(|s| ledger.insert(s).then_some(())).count()
    }

    /// The ledger of `base_pc`, if one exists.
    pub fn get(&self, base_pc: u64) -> Option<&ChainLedger> {
        self.chains.get(&base_pc)
    }

    /// Recorded steps of `base_pc` in chain order.
    pub fn steps_for(&self, base_pc: u64) -> Option<&[ComputeStep]> {
        self.chains.get(&base_pc).map(ChainLedger::steps)
    }

    /// Returns `true` if `base_pc` already has a step for the instruction at `pc`.
    pub fn has_step(&self, base_pc: u64, pc: u64) -> bool {
        self.chains.get(&base_pc).is_some_and(|l| l.contains_pc(pc))
    }

    /// Replays the ledger of `base_pc` with `seed`.
    ///
    /// Returns `None` if `base_pc` has no ledger.
    pub fn recompute(&mut self, base_pc: u64, seed: u64) -> Option<u64> {
        self.chains.get_mut(&base_pc).map(|l| l.recompute(seed))
    }
}
