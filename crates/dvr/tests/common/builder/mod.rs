//! Builders for raw encodings and renamed instructions.



pub use inst::FakeInst;
pub use instruction::InstructionBuilder;
