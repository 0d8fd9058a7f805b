use dvr_core::isa::disasm::disassemble;
use pretty_assertions::assert_eq;

use crate::common::builder::InstructionBuilder;

fn ib() -> InstructionBuilder {
    InstructionBuilder::new()
}

#[test]
fn test_gather_idiom_mnemonics() {
    assert_eq!(disassemble(ib().slli(6, 5, 3).build()), "slli t1, t0, 3");
    assert_eq!(disassemble(ib().add(6, 6, 10).build()), "add t1, t1, a0");
    assert_eq!(disassemble(ib().ld(7, 6, 16).build()), "ld t2, 16(t1)");
}

#[test]
fn test_untracked_mnemonics() {
    assert_eq!(disassemble(ib().sub(10, 11, 12).build()), "sub a0, a1, a2");
    assert_eq!(disassemble(ib().addi(5, 5, -1).build()), "addi t0, t0, -1");
    assert_eq!(disassemble(ib().beq(5, 6, 16).build()), "beq t0, t1, 16");
}

#[test]
fn test_store_offset() {
    let sd = ib()
        .opcode(dvr_core::isa::rv64i::opcodes::OP_STORE)
        .funct3(0b011)
        .rs1(2)
        .rs2(8)
        .imm(-24)
        .build();
    assert_eq!(disassemble(sd), "sd s0, -24(sp)");
}
