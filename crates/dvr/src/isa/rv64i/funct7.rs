//! RV64I function extension codes (funct7, bits 31-25).
//!
//! Separates register-register operations that share a funct3, such as ADD
//! and SUB.

/// Standard encoding (ADD, SRL).
pub const DEFAULT: u32 = 0b0000000;

/// Alternate encoding (SUB, SRA).
pub const ALT: u32 = 0b0100000;
