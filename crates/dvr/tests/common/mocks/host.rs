use std::collections::{HashMap, HashSet};

use dvr_core::CoreController;
use mockall::mock;

mock! {
    pub Host {}
    impl CoreController for Host {
        fn is_stride_pc(&self, pc: u64) -> bool;
        fn latest_vector_load_value(&self) -> Option<u64>;
        fn stride_value(&self, pc: u64) -> i64;
    }
}

/// A host whose answers are fixed up front.
#[derive(Clone, Debug, Default)]
pub struct FakeHost {
    pub stride_pcs: HashSet<u64>,
    pub vector_value: Option<u64>,
    pub strides: HashMap<u64, i64>,
}

impl FakeHost {
    /// Host that recognises every PC in `pcs` as a stride load.
    pub fn with_strides(pcs: &[u64]) -> Self {
        Self {
            stride_pcs: pcs.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn vector_value(mut self, value: Option<u64>) -> Self {
        self.vector_value = value;
        self
    }
}

impl CoreController for FakeHost {
    fn is_stride_pc(&self, pc: u64) -> bool {
        self.stride_pcs.contains(&pc)
    }

    fn latest_vector_load_value(&self) -> Option<u64> {
        self.vector_value
    }

    fn stride_value(&self, pc: u64) -> i64 {
        self.strides.get(&pc).copied().unwrap_or(0)
    }
}
