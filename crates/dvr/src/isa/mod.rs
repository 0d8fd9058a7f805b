//! Instruction Set Architecture (ISA) Definitions.
//!
//! The scoreboard reads raw RV64I instruction words handed over by the host core.
//! This module contains the field extraction, decoding, classification and
//! disassembly it needs for that.
//!
//! # Contents
//!
//! * `rv64i`: Base integer opcodes and function codes.
//! * `classify`: The shift / add / load categories that form address chains.
//! * `disasm`: Mnemonics for chain diagnostics.

/// Operation classification for index-computation chains.
pub mod classify;

/// Instruction decoding for the RV64I formats.
pub mod decode;

/// Instruction disassembler for diagnostics.
pub mod disasm;

/// Instruction field extraction utilities.
pub mod instruction;

/// Base integer instruction set constants.
pub mod rv64i;

pub use classify::{Classified, OpClass, classify};
