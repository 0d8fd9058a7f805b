//! Inline Ledger and Replay.
//!
//! Steps recorded while propagating are committed when the chain closes and
//! can be replayed from any seed.

use dvr_core::core::taint::StepOp;
use dvr_core::TaintScoreboard;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::builder::FakeInst;
use crate::common::mocks::FakeHost;
use crate::common::p;

const BASE: u64 = 0x1000;

/// Closes `base -> slli 3 -> add 0x8000 -> ld +16` seeded with `seed`.
fn gather_chain(seed: u64) -> TaintScoreboard {
    let host = FakeHost::with_strides(&[BASE]);
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), BASE, seed).unwrap();
    let _ = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 3));
    let _ = sb.propagate(&FakeInst::add(0x1008, 7, 6, 9).operands(&[seed << 3, 0x8000]));
    let _ = sb.propagate(&FakeInst::ld(0x100c, 8, 7, 16));
    sb
}

#[test]
fn test_worked_example_replay() {
    let host = FakeHost::with_strides(&[BASE]);
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), BASE, 16).unwrap();
    let _ = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 2));
    let _ = sb.propagate(&FakeInst::ld(0x1008, 7, 6, 8));

    assert_eq!(sb.recompute(BASE, 100), Some(408));
}

#[test]
fn test_recorded_steps() {
    let sb = gather_chain(2);
    let steps = sb.compute_steps_for(BASE).unwrap();

    let summary: Vec<(u64, usize, StepOp, u64)> = steps
        .iter()
        .map(|s| (s.pc, s.position, s.op, s.operand))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0x1004, 1, StepOp::Shift, 3),
            (0x1008, 2, StepOp::Add, 0x8000),
            (0x100c, 3, StepOp::LoadOffset, 16),
        ]
    );
    assert_eq!(steps[0].description, "Left shift by 3");
    assert_eq!(steps[1].description, "Add base and offset");
    assert_eq!(steps[2].description, "Load from memory: base +16");
    assert_eq!(steps[2].output, (2 << 3) + 0x8000 + 16);
    assert_eq!(sb.stats().recorded_steps, 3);
}

#[test]
fn test_replay_overwrites_step_values() {
    let mut sb = gather_chain(2);
    assert_eq!(sb.recompute(BASE, 10), Some(80 + 0x8000 + 16));

    let steps = sb.compute_steps_for(BASE).unwrap();
    assert_eq!((steps[0].input, steps[0].output), (10, 80));
    assert_eq!((steps[1].input, steps[1].output), (80, 80 + 0x8000));
}

#[test]
fn test_unknown_base_has_no_replay() {
    let mut sb = gather_chain(2);
    assert_eq!(sb.recompute(0x9999, 10), None);
    assert_eq!(sb.compute_steps_for(0x9999), None);
}

#[test]
fn test_negative_offset_and_wrapping() {
    let host = FakeHost::with_strides(&[BASE]);
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), BASE, 0).unwrap();
    let _ = sb.propagate(&FakeInst::ld(0x1004, 6, 5, -8));

    assert_eq!(sb.recompute(BASE, 0), Some(u64::MAX - 7));
    assert_eq!(sb.recompute(BASE, 8), Some(0));
}

#[test]
fn test_unmodelled_operations_are_not_recorded() {
    let host = FakeHost::with_strides(&[BASE]);
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), BASE, 4).unwrap();
    let _ = sb.propagate(&FakeInst::addi(0x1004, 6, 5, 1));
    let _ = sb.propagate(&FakeInst::slli(0x1008, 7, 6, 1));
    let _ = sb.propagate(&FakeInst::ld(0x100c, 8, 7, 0));

    let positions: Vec<usize> = sb
        .compute_steps_for(BASE)
        .unwrap()
        .iter()
        .map(|s| s.position)
        .collect();
    assert_eq!(positions, vec![2, 3]);
    assert_eq!(sb.recompute(BASE, 4), Some(8));
}

proptest! {
    #[test]
    fn prop_replay_is_deterministic(seed in any::<u64>()) {
        let mut sb = gather_chain(1);
        let first = sb.recompute(BASE, seed);
        let second = sb.recompute(BASE, seed);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_replay_is_linear_in_seed(s1 in any::<u64>(), s2 in any::<u64>()) {
        // slli 3, add, offset: f(s) = 8s + c, so f(s1) - f(s2) = 8(s1 - s2).
        let mut sb = gather_chain(1);
        let r1 = sb.recompute(BASE, s1).unwrap();
        let r2 = sb.recompute(BASE, s2).unwrap();
        prop_assert_eq!(r1.wrapping_sub(r2), s1.wrapping_sub(s2).wrapping_mul(8));
    }
}
