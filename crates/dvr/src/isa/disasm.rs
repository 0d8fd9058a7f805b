//! RV64I disassembler for chain diagnostics.
//!
//! Turns an instruction word into a mnemonic string so that the instructions
//! joining a dependency chain can be logged in readable form.
//!
//! # Usage
//!
//! ```
//! use dvr_core::isa::disasm::disassemble;
//! let text = disassemble(0x00A00513); // ADDI x10, x0, 10
//! assert_eq!(text, "addi a0, zero, 10");
//! ```

use crate::isa::decode::decode;
use crate::isa::instruction::Decoded;
use crate::isa::rv64i::{funct3 as i_f3, funct7 as i_f7, opcodes as i_op};

/// ABI register names for x0–x31.
const REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name for an integer register index.
#[inline]
fn xreg(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("x??")
}

/// Disassembles a 32-bit instruction into a human-readable string.
///
/// Returns a mnemonic like `"add a0, a1, a2"`, or `"unknown"` for encodings
/// outside RV64I.
pub fn disassemble(inst: u32) -> String {
    let d = decode(inst);
    let (rd, rs1, rs2, imm) = (xreg(d.rd), xreg(d.rs1), xreg(d.rs2), d.imm);

    match d.opcode {
        i_op::OP_REG => disasm_op_reg(&d, false),
        i_op::OP_REG_32 => disasm_op_reg(&d, true),
        i_op::OP_IMM => disasm_op_imm(&d, false),
        i_op::OP_IMM_32 => disasm_op_imm(&d, true),

        i_op::OP_LOAD => {
            let mn = match d.funct3 {
                i_f3::LB => "lb",
                i_f3::LH => "lh",
                i_f3::LW => "lw",
                i_f3::LD => "ld",
                i_f3::LBU => "lbu",
                i_f3::LHU => "lhu",
                i_f3::LWU => "lwu",
                _ => "l??",
            };
            format!("{mn} {rd}, {imm}({rs1})")
        }

        i_op::OP_STORE => {
            let mn = match d.funct3 {
                i_f3::SB => "sb",
                i_f3::SH => "sh",
                i_f3::SW => "sw",
                i_f3::SD => "sd",
                _ => "s??",
            };
            format!("{mn} {rs2}, {imm}({rs1})")
        }

        i_op::OP_BRANCH => {
            let mn = match d.funct3 {
                i_f3::BEQ => "beq",
                i_f3::BNE => "bne",
                i_f3::BLT => "blt",
                i_f3::BGE => "bge",
                i_f3::BLTU => "bltu",
                i_f3::BGEU => "bgeu",
                _ => "b??",
            };
            format!("{mn} {rs1}, {rs2}, {imm}")
        }

        i_op::OP_LUI => format!("lui {rd}, {:#x}", (imm >> 12) & 0xFFFFF),
        i_op::OP_AUIPC => format!("auipc {rd}, {:#x}", (imm >> 12) & 0xFFFFF),
        i_op::OP_JAL => format!("jal {rd}, {imm}"),
        i_op::OP_JALR => format!("jalr {rd}, {imm}({rs1})"),
        i_op::OP_MISC_MEM => "fence".to_string(),
        i_op::OP_SYSTEM => "system".to_string(),

        _ => "unknown".to_string(),
    }
}

/// Disassembles an R-type integer operation (OP or OP-32).
fn disasm_op_reg(d: &Decoded, is_w: bool) -> String {
    let suffix = if is_w { "w" } else { "" };
    let mn = match (d.funct3, d.funct7) {
        (i_f3::ADD_SUB, i_f7::DEFAULT) => "add",
        (i_f3::ADD_SUB, i_f7::ALT) => "sub",
        (i_f3::SLL, _) => "sll",
        (i_f3::SLT, _) => "slt",
        (i_f3::SLTU, _) => "sltu",
        (i_f3::XOR, _) => "xor",
        (i_f3::SRL_SRA, i_f7::DEFAULT) => "srl",
        (i_f3::SRL_SRA, i_f7::ALT) => "sra",
        (i_f3::OR, _) => "or",
        (i_f3::AND, _) => "and",
        _ => "r??",
    };
    format!("{mn}{suffix} {}, {}, {}", xreg(d.rd), xreg(d.rs1), xreg(d.rs2))
}

/// Disassembles an I-type integer operation (OP-IMM or OP-IMM-32).
fn disasm_op_imm(d: &Decoded, is_w: bool) -> String {
    let suffix = if is_w { "w" } else { "" };
    let (rd, rs1, imm) = (xreg(d.rd), xreg(d.rs1), d.imm);
    let shamt = imm & 0x3F;
    let mn = match d.funct3 {
        i_f3::ADD_SUB => "addi",
        i_f3::SLT => "slti",
        i_f3::SLTU => "sltiu",
        i_f3::XOR => "xori",
        i_f3::OR => "ori",
        i_f3::AND => "andi",
        i_f3::SLL => return format!("slli{suffix} {rd}, {rs1}, {shamt}"),
        i_f3::SRL_SRA => {
            let mn = if (imm >> 10) & 1 != 0 { "srai" } else { "srli" };
            return format!("{mn}{suffix} {rd}, {rs1}, {shamt}");
        }
        _ => "i??",
    };
    format!("{mn}{suffix} {rd}, {rs1}, {imm}")
}
