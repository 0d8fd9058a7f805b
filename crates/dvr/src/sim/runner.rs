//! Trace runner: plays a recorded trace through the taint scoreboard.
//!
//! For every instruction, in trace order:
//! 1. **Seed:** A load at a stride PC that has not produced a chain yet seeds
//!    taint on its first destination register.
//! 2. **Propagate:** Every other instruction is offered to the active session.
//! 3. **Commit:** With the `Deferred` trigger, executed instructions wait in a
//!    retirement window. The window drains when a chain closes and when the
//!    trace ends, offering each retired instruction to positional recording.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, RecordTrigger};
use crate::core::taint::chain::DependencyChain;
use crate::core::taint::ledger::ComputeStep;
use crate::core::taint::scoreboard::{Propagation, TaintScoreboard};
use crate::core::taint::traits::CoreController;
use crate::sim::trace::{Trace, TraceHost, TraceInst};
use crate::stats::TaintStats;

/// Instructions held for retirement before the oldest is committed.
pub const RETIRE_WINDOW: usize = 1024;

/// Compute steps of one completed chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerReport {
    /// Base PC of the chain.
    pub base_pc: u64,
    /// Steps in chain order.
    pub steps: Vec<ComputeStep>,
}

/// Result of running a trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Instructions played.
    pub instructions: usize,
    /// Completed chains in the order they closed.
    pub chains: Vec<DependencyChain>,
    /// Ledger of every completed chain that recorded steps.
    pub ledgers: Vec<LedgerReport>,
    /// Final statistics.
    pub stats: TaintStats,
}

/// Drives a `TaintScoreboard` with the instructions of a trace.
#[derive(Debug)]
pub struct TraceRunner {
    scoreboard: TaintScoreboard,
    host: TraceHost,
    /// Executed instructions waiting to retire (`Deferred` trigger only).
    pending: VecDeque<usize>,
}

impl TraceRunner {
    /// Creates a runner for `trace` with a fresh scoreboard.
    pub fn new(config: &Config, trace: &Trace) -> Self {
        Self {
            scoreboard: TaintScoreboard::with_config(config),
            host: TraceHost::new(trace),
            pending: VecDeque::new(),
        }
    }

    /// The scoreboard being driven.
    pub const fn scoreboard(&self) -> &TaintScoreboard {
        &self.scoreboard
    }

    /// Mutable access to the scoreboard, e.g. to replay ledgers after a run.
    pub const fn scoreboard_mut(&mut self) -> &mut TaintScoreboard {
        &mut self.scoreboard
    }

    /// Plays every instruction of `trace` and summarises the result.
    pub fn run(&mut self, trace: &Trace) -> RunSummary {
        info!(
            instructions = trace.instructions.len(),
            stride_pcs = trace.stride_pcs.len(),
            "DVR: running trace"
        );

        for (idx, inst) in trace.instructions.iter().enumerate() {
            let closed = self.step(inst);
            if self.scoreboard.trigger() == RecordTrigger::Deferred {
                self.pending.push_back(idx);
                if closed {
                    self.drain(trace, 0);
                } else {
                    self.drain(trace, RETIRE_WINDOW);
                }
            }
        }
        self.drain(trace, 0);

        self.summary(trace.instructions.len())
    }

    /// Executes one instruction. Returns `true` if it closed a chain.
    pub fn step(&mut self, inst: &TraceInst) -> bool {
        self.host.observe(inst);

        let seeds = inst.load
            && self.host.is_stride_pc(inst.pc)
            && !self.scoreboard.has_completed(inst.pc);
        if seeds {
            if let Some(&dest) = inst.dests.first() {
                if let Ok(seed) = self.scoreboard.seed_taint(&self.host, dest, inst.pc) {
                    debug!(
                        pc = format_args!("{:#x}", inst.pc),
                        seed,
                        stride = self.scoreboard.stride_value(&self.host, inst.pc),
                        "DVR: stride load seeded"
                    );
                }
                return false;
            }
        }

        matches!(
            self.scoreboard.propagate(inst),
            Propagation::ChainClosed { .. }
        )
    }

    /// Retires pending instructions until at most `keep` remain.
    fn drain(&mut self, trace: &Trace, keep: usize) {
        while self.pending.len() > keep {
            let Some(idx) = self.pending.pop_front() else {
                break;
            };
            if let Some(inst) = trace.instructions.get(idx) {
                let _ = self.scoreboard.record_at_commit(inst);
            }
        }
    }

    fn summary(&self, instructions: usize) -> RunSummary {
        let chains = self.scoreboard.completed_chains().to_vec();
        let ledgers = chains
            .iter()
            .filter_map(|c| {
                self.scoreboard
                    .compute_steps_for(c.base_pc)
                    .map(|steps| LedgerReport {
                        base_pc: c.base_pc,
                        steps: steps.to_vec(),
                    })
            })
            .collect();

        RunSummary {
            instructions,
            chains,
            ledgers,
            stats: self.scoreboard.stats(),
        }
    }
}
