//! Taint tracking session.
//!
//! A session is the bounded tracking state between seeding taint at a stride
//! load and either closing a chain or abandoning it. The chain is held twice:
//! once as an insertion-ordered list (the dataflow order used for reporting
//! and ledger positions) and once as a hash set for membership checks.

use std::collections::HashSet;

use crate::core::taint::chain::DependencyChain;
use crate::core::taint::ledger::ComputeStep;

/// The single active tracking session.
#[derive(Clone, Debug)]
pub struct TaintSession {
    stride_pc: u64,
    seed: u64,
    chain: Vec<u64>,
    slots: Vec<usize>,
    members: HashSet<u64>,
    staged: Vec<ComputeStep>,
}

impl TaintSession {
    /// Opens a session rooted at the stride load `stride_pc`, seeded with `seed`.
    pub fn new(stride_pc: u64, seed: u64) -> Self {
        Self {
            stride_pc,
            seed,
            chain: vec![stride_pc],
            slots: vec![0],
            members: HashSet::from([stride_pc]),
            staged: Vec::new(),
        }
    }

    /// PC of the stride load that seeded this session.
    #[inline]
    pub const fn stride_pc(&self) -> u64 {
        self.stride_pc
    }

    /// Value the base register was seeded with.
    #[inline]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Chain addresses in the order they joined.
    pub fn chain(&self) -> &[u64] {
        &self.chain
    }

    /// Returns `true` if `pc` is already part of the chain.
    pub fn contains(&self, pc: u64) -> bool {
        self.members.contains(&pc)
    }

    /// Appends `pc` to the chain, noting that it read the taint through
    /// source operand `slot`.
    ///
    /// Returns the position of `pc` in the chain, or `None` if it was already
    /// present (addresses are unique within a chain).
    pub fn extend(&mut self, pc: u64, slot: usize) -> Option<usize> {
        if !self.members.insert(pc) {
            return None;
        }
        self.chain.push(pc);
        self.slots.push(slot);
        Some(self.chain.len() - 1)
    }

    /// Stages a compute step until the chain closes.
    pub fn stage(&mut self, step: ComputeStep) {
        self.staged.push(step);
    }

    /// Steps staged so far, in the order they were observed.
    pub fn staged(&self) -> &[ComputeStep] {
        &self.staged
    }

    /// Closes the session at the indirect load `indirect_pc`.
    ///
    /// Returns the completed chain record and the steps staged along the way.
    pub fn close(self, indirect_pc: u64) -> (DependencyChain, Vec<ComputeStep>) {
        let chain = DependencyChain {
            base_pc: self.stride_pc,
            indirect_pc,
            chain_pcs: self.chain,
            taint_slots: self.slots,
            seed: self.seed,
        };
        (chain, self.staged)
    }
}
