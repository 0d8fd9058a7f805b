//! Renamed (physical) register identifiers.
//!
//! The host core hands the scoreboard instructions whose operands have already
//! been through register renaming. This module provides:
//! 1. **Identity:** `PhysRegId`, a physical register index tagged with its register class.
//! 2. **Display:** Class-prefixed names used in diagnostics (`int:12`, `fp:3`).
//!
//! The taint table is flat: it is indexed by `PhysRegId::index` alone, so a host
//! that keeps separate integer and floating-point free lists must hand out
//! disjoint index ranges if it wants them tracked independently.

use std::fmt;

use serde::Deserialize;

/// Register class of a physical register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum RegClass {
    /// Integer register file.
    #[default]
    Int,
    /// Floating-point register file.
    Float,
}

impl RegClass {
    /// Short class name used as a prefix in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "fp",
        }
    }
}

/// A renamed physical register.
///
/// Deserializes either from a bare index (`12`, an integer register) or from
/// `{"class": "Float", "index": 12}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RegRepr")]
pub struct PhysRegId {
    /// Register class the index belongs to.
    pub class: RegClass,
    /// Physical register index.
    pub index: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegRepr {
    Index(usize),
    Tagged {
        #[serde(default)]
        class: RegClass,
        index: usize,
    },
}

impl From<RegRepr> for PhysRegId {
    fn from(repr: RegRepr) -> Self {
        match repr {
            RegRepr::Index(index) => Self::int(index),
            RegRepr::Tagged { class, index } => Self { class, index },
        }
    }
}

impl PhysRegId {
    /// Creates an integer physical register identifier.
    #[inline]
    pub const fn int(index: usize) -> Self {
        Self {
            class: RegClass::Int,
            index,
        }
    }

    /// Creates a floating-point physical register identifier.
    #[inline]
    pub const fn float(index: usize) -> Self {
        Self {
            class: RegClass::Float,
            index,
        }
    }
}

impl From<usize> for PhysRegId {
    fn from(index: usize) -> Self {
        Self::int(index)
    }
}

impl fmt::Display for PhysRegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.class.name(), self.index)
    }
}
