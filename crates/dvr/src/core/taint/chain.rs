//! Dependency Chain Store.
//!
//! Holds the completed chains that connect a stride (base) load to the indirect
//! load whose address it feeds, together with the set of base PCs that have
//! already produced a chain. Records are append-only: once stored, a chain is
//! never mutated or removed, and a base PC never gets a second chain.

use std::collections::HashSet;

use serde::Serialize;

/// A completed chain from a stride load to a dependent indirect load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DependencyChain {
    /// PC of the stride load that seeded the chain.
    pub base_pc: u64,
    /// PC of the indirect load that closed the chain.
    pub indirect_pc: u64,
    /// Every instruction of the chain in dataflow order, base first.
    pub chain_pcs: Vec<u64>,
    /// Source operand slot that carried the taint into each instruction of
    /// `chain_pcs` (0 for the base).
    pub taint_slots: Vec<usize>,
    /// Value the chain was seeded with while it was being tracked.
    pub seed: u64,
}

impl DependencyChain {
    /// Position of `pc` within the chain, if it belongs to it.
    pub fn position_of(&self, pc: u64) -> Option<usize> {
        self.chain_pcs.iter().position(|&p| p == pc)
    }

    /// Source slot through which `pc` read the tainted value.
    pub fn taint_slot(&self, pc: u64) -> Option<usize> {
        self.position_of(pc)
            .and_then(|pos| self.taint_slots.get(pos).copied())
    }

    /// Returns `true` if `pc` is the last instruction of the chain.
    pub fn is_last(&self, pc: u64) -> bool {
        self.chain_pcs.last() == Some(&pc)
    }
}

/// Append-only store of completed chains.
#[derive(Clone, Debug, Default)]
pub struct ChainStore {
    chains: Vec<DependencyChain>,
    completed: HashSet<u64>,
}

impl ChainStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a chain and marks its base PC completed.
    ///
    /// Returns `false` without storing anything if the base PC already has a chain.
    pub fn record(&mut self, chain: DependencyChain) -> bool {
        if !self.completed.insert(chain.base_pc) {
            return false;
        }
        self.chains.push(chain);
        true
    }

    /// Looks up the chain whose base PC is `pc`.
    pub fn lookup(&self, pc: u64) -> Option<&DependencyChain> {
        self.chains.iter().find(|c| c.base_pc == pc)
    }

    /// Returns `true` if the stride load at `pc` has already produced a chain.
    pub fn is_completed(&self, pc: u64) -> bool {
        self.completed.contains(&pc)
    }

    /// Completed chains in the order they closed.
    pub fn chains(&self) -> &[DependencyChain] {
        &self.chains
    }

    /// Chains that include `pc` anywhere along their path.
    pub fn containing(&self, pc: u64) -> impl Iterator<Item = &DependencyChain> {
        self.chains.iter().filter(move |c| c.position_of(pc).is_some())
    }

    /// Number of completed chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if no chain has completed yet.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
