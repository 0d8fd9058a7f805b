//! Instruction Field Classifier.
//!
//! Sorts an encoded instruction into the few operation categories that build an
//! effective address along an index-computation chain:
//! 1. **Constant left shift** (`slli`) scales an index.
//! 2. **Register-register add** (`add`) combines a base with an index.
//! 3. **Memory load** (`l*`) performs the final indirection with an immediate offset.
//!
//! Everything else is `OpClass::Other`. Classification never fails; the caller
//! decides whether an unclassified instruction is worth recording.

use std::fmt;

use crate::isa::decode::decode;
use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::rv64i::{funct3, funct7, opcodes};

/// Operation category of an instruction, with the fields the ledger needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    /// Left shift by a constant amount.
    ShiftLeft {
        /// Shift amount taken from the immediate (0-63).
        shamt: u32,
    },
    /// Register-register add.
    Add,
    /// Memory load.
    Load {
        /// Sign-extended 12-bit address offset.
        offset: i64,
    },
    /// Any operation the chain tracker does not model.
    Other,
}

impl OpClass {
    /// Returns `true` for every category except `Other`.
    #[inline]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Short mnemonic for the category.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::ShiftLeft { .. } => "slli",
            Self::Add => "add",
            Self::Load { .. } => "load",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for OpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShiftLeft { shamt } => write!(f, "slli {shamt}"),
            Self::Add => f.write_str("add"),
            Self::Load { offset } => write!(f, "load {offset:+}"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// A classified instruction: the decoded fields plus their category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classified {
    /// Decoded instruction fields.
    pub decoded: Decoded,
    /// Operation category.
    pub class: OpClass,
}

/// Classifies a 32-bit instruction encoding.
///
/// # Arguments
///
/// * `inst` - The raw instruction word.
///
/// # Examples
///
/// ```
/// use dvr_core::isa::classify::{classify, OpClass};
///
/// // slli x6, x5, 2
/// assert_eq!(classify(0x0022_9313).class, OpClass::ShiftLeft { shamt: 2 });
/// // lw x7, 8(x6)
/// assert_eq!(classify(0x0083_2383).class, OpClass::Load { offset: 8 });
/// ```
pub fn classify(inst: u32) -> Classified {
    let decoded = decode(inst);
    let class = match decoded.opcode {
        opcodes::OP_IMM if decoded.funct3 == funct3::SLL => OpClass::ShiftLeft {
            shamt: inst.shamt(),
        },
        opcodes::OP_REG if decoded.funct3 == funct3::ADD_SUB && decoded.funct7 == funct7::DEFAULT => {
            OpClass::Add
        }
        opcodes::OP_LOAD => OpClass::Load {
            offset: decoded.imm,
        },
        _ => OpClass::Other,
    };

    Classified { decoded, class }
}
