
/// Disassembly of chain instructions.
pub mod disasm;
