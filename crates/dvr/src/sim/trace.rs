//! Instruction trace format.
//!
//! A trace is a JSON record of the instructions a core executed after register
//! renaming, plus what the core's stride detector knew. It provides:
//! 1. **Format:** `Trace` and `TraceInst`, parsed from JSON with addresses and
//!    instruction words given as numbers or `0x` strings.
//! 2. **Host:** `TraceHost`, a `CoreController` answering from the trace.
//!
//! ```json
//! {
//!   "stride_pcs": ["0x1000"],
//!   "strides": [{ "pc": "0x1000", "stride": 8 }],
//!   "instructions": [
//!     { "pc": "0x1000", "inst": "0x0002b283", "dests": [5], "value": 16 },
//!     { "pc": "0x1004", "inst": "0x00229313", "srcs": [5], "dests": [6] },
//!     { "pc": "0x1008", "inst": "0x00833383", "srcs": [6], "dests": [7] }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::TraceError;
use crate::common::reg::PhysRegId;
use crate::core::taint::traits::{CoreController, DynInst};
use crate::isa::instruction::InstructionBits;
use crate::isa::rv64i::opcodes;

/// Number or `0x`-prefixed hex string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Word {
    Num(u64),
    Text(String),
}

impl Word {
    fn value(&self) -> Option<u64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Text(s) => parse_word(s),
        }
    }

    fn text(&self) -> String {
        match self {
            Self::Num(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn address(&self) -> Result<u64, TraceError> {
        self.value().ok_or_else(|| TraceError::BadAddress(self.text()))
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal number.
///
/// Underscores are accepted as digit separators.
pub fn parse_word(text: &str) -> Option<u64> {
    let clean: String = text.trim().chars().filter(|&c| c != '_').collect();
    match clean
        .strip_prefix("0x")
        .or_else(|| clean.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => clean.parse().ok(),
    }
}

#[derive(Deserialize)]
struct RawTrace {
    #[serde(default)]
    stride_pcs: Vec<Word>,
    #[serde(default)]
    strides: Vec<RawStride>,
    #[serde(default)]
    instructions: Vec<RawInst>,
}

#[derive(Deserialize)]
struct RawStride {
    pc: Word,
    stride: i64,
}

#[derive(Deserialize)]
struct RawInst {
    pc: Word,
    inst: Word,
    #[serde(default)]
    srcs: Vec<PhysRegId>,
    #[serde(default)]
    dests: Vec<PhysRegId>,
    load: Option<bool>,
    direct_ctrl: Option<bool>,
    #[serde(default)]
    operands: Vec<Word>,
    value: Option<Word>,
    #[serde(default)]
    pred_taken: bool,
    pred_target: Option<Word>,
}

/// One renamed instruction of a trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceInst {
    /// Instruction address.
    pub pc: u64,
    /// Raw 32-bit encoding.
    pub raw: u32,
    /// Renamed source registers.
    pub srcs: Vec<PhysRegId>,
    /// Renamed destination registers.
    pub dests: Vec<PhysRegId>,
    /// Memory load flag (defaults to the `LOAD` opcode).
    pub load: bool,
    /// Direct control transfer flag (defaults to the `BRANCH` and `JAL` opcodes).
    pub direct_ctrl: bool,
    /// Source operand values, by operand index.
    pub operands: Vec<u64>,
    /// Value the instruction produced, if recorded.
    pub value: Option<u64>,
    /// Branch predicted taken.
    pub pred_taken: bool,
    /// Predicted branch target.
    pub pred_target: Option<u64>,
}

impl TraceInst {
    fn resolve(raw: RawInst) -> Result<Self, TraceError> {
        let pc = raw.pc.address()?;
        let word = raw
            .inst
            .value()
            .and_then(|w| u32::try_from(w).ok())
            .ok_or_else(|| TraceError::BadEncoding {
                pc,
                text: raw.inst.text(),
            })?;
        let opcode = word.opcode();

        Ok(Self {
            pc,
            raw: word,
            srcs: raw.srcs,
            dests: raw.dests,
            load: raw.load.unwrap_or(opcode == opcodes::OP_LOAD),
            direct_ctrl: raw
                .direct_ctrl
                .unwrap_or(opcode == opcodes::OP_BRANCH || opcode == opcodes::OP_JAL),
            operands: raw
                .operands
                .iter()
                .map(Word::address)
                .collect::<Result<_, _>>()?,
            value: raw.value.as_ref().map(Word::address).transpose()?,
            pred_taken: raw.pred_taken,
            pred_target: raw.pred_target.as_ref().map(Word::address).transpose()?,
        })
    }
}

impl DynInst for TraceInst {
    fn pc(&self) -> u64 {
        self.pc
    }

    fn raw_inst(&self) -> u32 {
        self.raw
    }

    fn src_regs(&self) -> &[PhysRegId] {
        &self.srcs
    }

    fn dest_regs(&self) -> &[PhysRegId] {
        &self.dests
    }

    fn is_load(&self) -> bool {
        self.load
    }

    fn is_direct_ctrl(&self) -> bool {
        self.direct_ctrl
    }

    fn pred_taken(&self) -> bool {
        self.pred_taken
    }

    fn pred_target(&self) -> Option<u64> {
        self.pred_target
    }

    fn src_operand(&self, idx: usize) -> Option<u64> {
        self.operands.get(idx).copied()
    }
}

/// A parsed instruction trace.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    /// Loads the stride detector has classified as strided.
    pub stride_pcs: HashSet<u64>,
    /// Detected stride per stride load.
    pub strides: HashMap<u64, i64>,
    /// Instructions in execution order.
    pub instructions: Vec<TraceInst>,
}

impl Trace {
    /// Parses a trace from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Parse` for malformed JSON and `BadAddress` or
    /// `BadEncoding` for numbers that cannot be read.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let raw: RawTrace = serde_json::from_str(json)?;
        Ok(Self {
            stride_pcs: raw
                .stride_pcs
                .iter()
                .map(Word::address)
                .collect::<Result<_, _>>()?,
            strides: raw
                .strides
                .iter()
                .map(|s| s.pc.address().map(|pc| (pc, s.stride)))
                .collect::<Result<_, _>>()?,
            instructions: raw
                .instructions
                .into_iter()
                .map(TraceInst::resolve)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Reads and parses a trace file.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::Io` if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Core controller backed by a trace.
///
/// The latest vectorised load value is the value produced by the most recent
/// stride load the host has observed.
#[derive(Clone, Debug, Default)]
pub struct TraceHost {
    stride_pcs: HashSet<u64>,
    strides: HashMap<u64, i64>,
    latest_vector_value: Option<u64>,
}

impl TraceHost {
    /// Creates a host answering from the stride information of `trace`.
    pub fn new(trace: &Trace) -> Self {
        Self {
            stride_pcs: trace.stride_pcs.clone(),
            strides: trace.strides.clone(),
            latest_vector_value: None,
        }
    }

    /// Notes an executed instruction; stride loads update the latest vector value.
    pub fn observe(&mut self, inst: &TraceInst) {
        if inst.load && self.stride_pcs.contains(&inst.pc) && inst.value.is_some() {
            self.latest_vector_value = inst.value;
        }
    }
}

impl CoreController for TraceHost {
    fn is_stride_pc(&self, pc: u64) -> bool {
        self.stride_pcs.contains(&pc)
    }

    fn latest_vector_load_value(&self) -> Option<u64> {
        self.latest_vector_value
    }

    fn stride_value(&self, pc: u64) -> i64 {
        self.strides.get(&pc).copied().unwrap_or(0)
    }
}
