//! Taint Propagation State Machine.
//!
//! The scoreboard keeps one taint bit per physical register and a shadow value
//! for each tainted register. The host calls it once per instruction of
//! interest:
//! 1. **Seeding:** A stride load taints its destination and opens a session.
//! 2. **Propagation:** Instructions reading a tainted register join the chain and
//!    taint their destination; untainted writes kill stale taint.
//! 3. **Closing:** A load with a tainted source is the indirect access. The chain
//!    is stored, its compute steps land in the ledger, and all taint is cleared.
//!
//! At most one session is open at a time. Seeding while a session is open
//! abandons it; nothing it collected is kept.

use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use crate::common::error::TaintError;
use crate::common::reg::PhysRegId;
use crate::config::{Config, RecordTrigger, ScoreboardConfig};
use crate::core::taint::chain::{ChainStore, DependencyChain};
use crate::core::taint::ledger::{ComputeLedger, ComputeStep};
use crate::core::taint::session::TaintSession;
use crate::core::taint::traits::{CoreController, DynInst};
use crate::isa::classify::{OpClass, classify};
use crate::isa::disasm::disassemble;
use crate::stats::TaintStats;

/// Outcome of offering one instruction to [`TaintScoreboard::propagate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    /// No session is open.
    Idle,
    /// The session's base PC had already completed; the session and its taint were cleared.
    StaleSession {
        /// Base PC of the closed session.
        base_pc: u64,
    },
    /// No source is tainted and no tainted destination was overwritten.
    Clean,
    /// No source is tainted and the destination lost its taint.
    Killed {
        /// Register whose taint was cleared.
        reg: PhysRegId,
    },
    /// A tainted source was read; its taint moved to the destination, if any.
    Propagated {
        /// First tainted source register.
        src: PhysRegId,
        /// Destination that became tainted.
        dest: Option<PhysRegId>,
    },
    /// A load with a tainted source closed the chain.
    ChainClosed {
        /// Stride load that seeded the chain.
        base_pc: u64,
        /// Indirect load that closed it.
        indirect_pc: u64,
    },
}

/// Taint scoreboard over the host core's physical registers.
#[derive(Debug)]
pub struct TaintScoreboard {
    tainted: Vec<bool>,
    /// Last known value of each tainted register.
    shadow: HashMap<usize, u64>,
    session: Option<TaintSession>,
    store: ChainStore,
    ledger: ComputeLedger,
    config: ScoreboardConfig,
    trigger: RecordTrigger,
    stats: TaintStats,
}

impl TaintScoreboard {
    /// Creates a scoreboard for a core with `num_phys_regs` physical registers.
    ///
    /// Zero selects the default capacity. Everything else uses default configuration.
    pub fn new(num_phys_regs: usize) -> Self {
        let config = ScoreboardConfig {
            num_phys_regs,
            ..ScoreboardConfig::default()
        };
        Self::build(config, RecordTrigger::default())
    }

    /// Creates a scoreboard from a full configuration.
    pub fn with_config(config: &Config) -> Self {
        Self::build(config.scoreboard.clone(), config.ledger.trigger)
    }

    fn build(config: ScoreboardConfig, trigger: RecordTrigger) -> Self {
        let capacity = config.effective_num_phys_regs();
        Self {
            tainted: vec![false; capacity],
            shadow: HashMap::new(),
            session: None,
            store: ChainStore::new(),
            ledger: ComputeLedger::new(),
            config,
            trigger,
            stats: TaintStats::default(),
        }
    }

    /// Number of entries in the taint table.
    pub fn capacity(&self) -> usize {
        self.tainted.len()
    }

    /// When compute steps are recorded.
    pub const fn trigger(&self) -> RecordTrigger {
        self.trigger
    }

    /// Seeds taint at the stride load `pc`, resolving the seed from the host.
    ///
    /// The seed is the host's latest vectorised load value, or the configured
    /// fallback when there is none. If a value is available and `pc` already
    /// owns a ledger, that ledger is replayed with it.
    ///
    /// Returns the seed that was used.
    ///
    /// # Errors
    ///
    /// Returns `TaintError::InvalidRegister` if `dest` is outside the taint
    /// table, and `TaintError::NonStridePc` if the host does not consider `pc`
    /// a stride load. Neither changes any state.
    pub fn seed_taint(
        &mut self,
        host: &dyn CoreController,
        dest: PhysRegId,
        pc: u64,
    ) -> Result<u64, TaintError> {
        self.check_seed(host, dest, pc)?;

        let seed = match host.latest_vector_load_value() {
            Some(value) => {
                if let Some(result) = self.ledger.recompute(pc, value) {
                    debug!(
                        pc = format_args!("{pc:#x}"),
                        seed = value,
                        result = format_args!("{result:#x}"),
                        "DVR: refreshed ledger with vector load value"
                    );
                }
                value
            }
            None => self.config.fallback_seed,
        };

        self.open_session(dest, pc, seed);
        Ok(seed)
    }

    /// Seeds taint at the stride load `pc` with an explicit `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`seed_taint`](Self::seed_taint).
    pub fn seed_taint_with_value(
        &mut self,
        host: &dyn CoreController,
        dest: PhysRegId,
        pc: u64,
        seed: u64,
    ) -> Result<(), TaintError> {
        self.check_seed(host, dest, pc)?;
        self.open_session(dest, pc, seed);
        Ok(())
    }

    fn check_seed(
        &mut self,
        host: &dyn CoreController,
        dest: PhysRegId,
        pc: u64,
    ) -> Result<(), TaintError> {
        let err = if dest.index >= self.tainted.len() {
            TaintError::InvalidRegister {
                index: dest.index,
                capacity: self.tainted.len(),
            }
        } else if !host.is_stride_pc(pc) {
            TaintError::NonStridePc(pc)
        } else {
            return Ok(());
        };

        self.stats.rejected_seeds += 1;
        warn!(pc = format_args!("{pc:#x}"), reg = %dest, error = %err, "DVR: seed rejected");
        Err(err)
    }

    fn open_session(&mut self, dest: PhysRegId, pc: u64, seed: u64) {
        if let Some(old) = self.session.take() {
            self.stats.abandoned_sessions += 1;
            debug!(
                old_pc = format_args!("{:#x}", old.stride_pc()),
                new_pc = format_args!("{pc:#x}"),
                chain_len = old.chain().len(),
                "DVR: abandoning open session"
            );
            self.reset_taint();
        }

        self.tainted[dest.index] = true;
        let _ = self.shadow.insert(dest.index, seed);
        self.session = Some(TaintSession::new(pc, seed));
        self.stats.seeds += 1;
        debug!(
            pc = format_args!("{pc:#x}"),
            reg = %dest,
            seed = format_args!("{seed:#x}"),
            "DVR: taint seeded"
        );
    }

    /// Offers one instruction to the active session.
    ///
    /// Call in program or execution order for every instruction of interest.
    pub fn propagate(&mut self, inst: &dyn DynInst) -> Propagation {
        let Some(base_pc) = self.session.as_ref().map(TaintSession::stride_pc) else {
            return Propagation::Idle;
        };

        if self.store.is_completed(base_pc) {
            self.clear_all_taints();
            self.stats.stale_sessions += 1;
            debug!(
                base_pc = format_args!("{base_pc:#x}"),
                "DVR: base already completed, closing session"
            );
            return Propagation::StaleSession { base_pc };
        }

        let pc = inst.pc();
        let dest = inst.dest_regs().first().copied();

        let Some((slot, src)) = self.first_tainted_source(inst) else {
            return match dest {
                Some(reg) if self.is_register_tainted(reg) => {
                    self.untaint(reg);
                    self.stats.taint_kills += 1;
                    debug!(pc = format_args!("{pc:#x}"), reg = %reg, "DVR: taint killed");
                    Propagation::Killed { reg }
                }
                _ => Propagation::Clean,
            };
        };

        let input = self.shadow.get(&src.index).copied().unwrap_or_default();
        let class = classify(inst.raw_inst()).class;
        let output = self.extend_chain(inst, slot, class, input);

        let dest = dest.filter(|reg| self.taint(*reg, output));
        if let Some(reg) = dest {
            self.stats.propagations += 1;
            debug!(
                pc = format_args!("{pc:#x}"),
                src = %src,
                dest = %reg,
                value = format_args!("{output:#x}"),
                "DVR: taint propagated"
            );
        }

        if inst.is_load() {
            return self.close_chain(pc);
        }
        Propagation::Propagated { src, dest }
    }

    /// Scans the sources in operand order for the first tainted one.
    fn first_tainted_source(&self, inst: &dyn DynInst) -> Option<(usize, PhysRegId)> {
        inst.src_regs().iter().copied().enumerate().find(|&(slot, reg)| {
            let tainted = self.is_register_tainted(reg);
            trace!(
                pc = format_args!("{:#x}", inst.pc()),
                slot,
                reg = %reg,
                tainted,
                "DVR: scan source"
            );
            tainted
        })
    }

    /// Adds `inst` to the open chain and stages its compute step.
    ///
    /// Returns the value leaving the instruction, which becomes the shadow
    /// value of its destination.
    fn extend_chain(
        &mut self,
        inst: &dyn DynInst,
        slot: usize,
        class: OpClass,
        input: u64,
    ) -> u64 {
        let pc = inst.pc();
        let trigger = self.trigger;
        let Some(session) = self.session.as_mut() else {
            return input;
        };

        let addend = if class == OpClass::Add {
            other_operand(inst, slot)
        } else {
            0
        };
        let Some(position) = session.extend(pc, slot) else {
            debug!(pc = format_args!("{pc:#x}"), "DVR: address already in chain");
            return ComputeStep::from_class(pc, 0, class, addend, input)
                .map_or(input, |step| step.output);
        };
        trace_decode(pc, inst.raw_inst(), position);

        let Some(step) = ComputeStep::from_class(pc, position, class, addend, input) else {
            return input;
        };

        let output = step.output;
        if trigger == RecordTrigger::Inline {
            debug!(step = %step, "DVR: staged compute step");
            session.stage(step);
        }
        output
    }

    fn close_chain(&mut self, indirect_pc: u64) -> Propagation {
        let Some(session) = self.session.take() else {
            return Propagation::Idle;
        };
        let (chain, staged) = session.close(indirect_pc);
        let base_pc = chain.base_pc;

        info!(
            base_pc = format_args!("{base_pc:#x}"),
            indirect_pc = format_args!("{indirect_pc:#x}"),
            len = chain.chain_pcs.len(),
            "DVR: dependency chain detected"
        );

        if !self.store.record(chain) {
            warn!(
                base_pc = format_args!("{base_pc:#x}"),
                "DVR: base already has a chain, new chain dropped"
            );
            self.stats.stale_sessions += 1;
            self.reset_taint();
            return Propagation::StaleSession { base_pc };
        }
        let committed = self.ledger.commit(base_pc, staged);
        self.stats.recorded_steps += committed as u64;
        self.stats.detected_patterns += 1;
        self.reset_taint();

        if self.config.log_chains {
            self.log_dependency_chains();
        }
        Propagation::ChainClosed {
            base_pc,
            indirect_pc,
        }
    }

    /// Records the compute step of `inst` into the ledger of `base_pc` by its
    /// position in the stored chain (commit or writeback time recording).
    ///
    /// Returns `true` if a step was inserted. Instructions outside the chain,
    /// the base load itself, unrecognised operations and PCs that already
    /// have a step are skipped, so repeated calls are harmless. When `inst`
    /// is the last instruction of the chain the ledger is replayed with the
    /// chain's seed and logged.
    pub fn record_deferred(&mut self, base_pc: u64, inst: &dyn DynInst) -> bool {
        let pc = inst.pc();
        let Some(chain) = self.store.lookup(base_pc) else {
            return false;
        };
        let Some(position) = chain.position_of(pc) else {
            return false;
        };
        let is_last = chain.is_last(pc);
        let seed = chain.seed;
        let slot = chain.taint_slots.get(position).copied().unwrap_or(0);

        let inserted = position > 0 && !self.ledger.has_step(base_pc, pc) && {
            let class = classify(inst.raw_inst()).class;
            let addend = if class == OpClass::Add {
                other_operand(inst, slot)
            } else {
                0
            };
            ComputeStep::from_class(pc, position, class, addend, 0)
                .is_some_and(|step| self.ledger.insert(base_pc, step))
        };

        if inserted {
            self.stats.recorded_steps += 1;
            debug!(
                base_pc = format_args!("{base_pc:#x}"),
                pc = format_args!("{pc:#x}"),
                position,
                "DVR: recorded compute step"
            );
        }

        if is_last {
            let _ = self.ledger.recompute(base_pc, seed);
            self.log_ledger(base_pc);
        }
        inserted
    }

    /// Offers `inst` to positional recording in every completed chain that
    /// contains it. Returns the number of steps inserted.
    pub fn record_at_commit(&mut self, inst: &dyn DynInst) -> usize {
        let bases: Vec<u64> = self
            .store
            .containing(inst.pc())
            .map(|c| c.base_pc)
            .collect();
        bases
            .into_iter()
            .filter(|&base_pc| self.record_deferred(base_pc, inst))
            .count()
    }

    /// Returns `true` if `reg` is tainted. Out-of-range registers are never tainted.
    pub fn is_register_tainted(&self, reg: PhysRegId) -> bool {
        self.tainted.get(reg.index).copied().unwrap_or(false)
    }

    /// Shadow value of a tainted register.
    pub fn shadow_value(&self, reg: PhysRegId) -> Option<u64> {
        self.shadow.get(&reg.index).copied()
    }

    fn taint(&mut self, reg: PhysRegId, value: u64) -> bool {
        let Some(bit) = self.tainted.get_mut(reg.index) else {
            warn!(reg = %reg, capacity = self.tainted.len(), "DVR: register out of range");
            return false;
        };
        *bit = true;
        let _ = self.shadow.insert(reg.index, value);
        true
    }

    fn untaint(&mut self, reg: PhysRegId) {
        if let Some(bit) = self.tainted.get_mut(reg.index) {
            *bit = false;
            let _ = self.shadow.remove(&reg.index);
        }
    }

    fn reset_taint(&mut self) {
        self.tainted.fill(false);
        self.shadow.clear();
    }

    /// Clears every taint bit and shadow value and closes the open session.
    pub fn clear_all_taints(&mut self) {
        self.reset_taint();
        self.session = None;
    }

    /// The open session, if any.
    pub const fn active_session(&self) -> Option<&TaintSession> {
        self.session.as_ref()
    }

    /// Completed chains in the order they closed.
    pub fn completed_chains(&self) -> &[DependencyChain] {
        self.store.chains()
    }

    /// The chain seeded at `pc`, if it has completed.
    pub fn lookup_chain(&self, pc: u64) -> Option<&DependencyChain> {
        self.store.lookup(pc)
    }

    /// Returns `true` if the stride load at `pc` has already produced a chain.
    pub fn has_completed(&self, pc: u64) -> bool {
        self.store.is_completed(pc)
    }

    /// Recorded compute steps of the chain seeded at `pc`, in chain order.
    pub fn compute_steps_for(&self, pc: u64) -> Option<&[ComputeStep]> {
        self.ledger.steps_for(pc)
    }

    /// Replays the ledger of `pc` from `seed` and returns the final value.
    ///
    /// Returns `None` if no steps were ever recorded for `pc`.
    pub fn recompute(&mut self, pc: u64, seed: u64) -> Option<u64> {
        let result = self.ledger.recompute(pc, seed)?;
        debug!(
            pc = format_args!("{pc:#x}"),
            seed = format_args!("{seed:#x}"),
            result = format_args!("{result:#x}"),
            "DVR: recompute"
        );
        Some(result)
    }

    /// Statistics snapshot.
    pub fn stats(&self) -> TaintStats {
        TaintStats {
            tainted_regs: self.tainted.iter().filter(|&&t| t).count(),
            ..self.stats
        }
    }

    /// Detected stride of the load at `pc`, as reported by the host.
    pub fn stride_value(&self, host: &dyn CoreController, pc: u64) -> i64 {
        let stride = host.stride_value(pc);
        trace!(pc = format_args!("{pc:#x}"), stride, "DVR: stride value");
        stride
    }

    /// Logs every completed chain with its numbered path.
    pub fn log_dependency_chains(&self) {
        info!(count = self.store.len(), "DVR: completed dependency chains");
        for chain in self.store.chains() {
            info!(
                base_pc = format_args!("{:#x}", chain.base_pc),
                indirect_pc = format_args!("{:#x}", chain.indirect_pc),
                "DVR: chain"
            );
            for (i, pc) in chain.chain_pcs.iter().enumerate() {
                info!(step = i + 1, pc = format_args!("{pc:#x}"), "DVR:   path");
            }
        }
    }

    fn log_ledger(&self, base_pc: u64) {
        let Some(steps) = self.ledger.steps_for(base_pc) else {
            return;
        };
        info!(
            base_pc = format_args!("{base_pc:#x}"),
            steps = steps.len(),
            "DVR: compute ledger complete"
        );
        for step in steps {
            info!(step = %step, "DVR:   step");
        }
    }
}

/// Value of the source operand that is not `slot`: the addend of an add step.
fn other_operand(inst: &dyn DynInst, slot: usize) -> u64 {
    let other = usize::from(slot == 0);
    inst.src_operand(other).unwrap_or_else(|| {
        debug!(
            pc = format_args!("{:#x}", inst.pc()),
            slot = other,
            "DVR: add operand unavailable, using 0"
        );
        0
    })
}

fn trace_decode(pc: u64, raw: u32, position: usize) {
    trace!(
        pc = format_args!("{pc:#x}"),
        position,
        raw = format_args!("{raw:#010x}"),
        asm = %disassemble(raw),
        "DVR: chain instruction"
    );
}
