//! Session Lifecycle.
//!
//! At most one session is open; reseeding abandons the open one, a session
//! whose base already completed is closed on its next use.

use dvr_core::{Propagation, TaintScoreboard};

use crate::common::builder::FakeInst;
use crate::common::mocks::FakeHost;
use crate::common::p;

fn host() -> FakeHost {
    FakeHost::with_strides(&[0x1000, 0x2000])
}

#[test]
fn test_reseeding_replaces_session() {
    let host = host();
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), 0x1000, 16).unwrap();
    let _ = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 2));

    sb.seed_taint_with_value(&host, p(10), 0x2000, 7).unwrap();

    let session = sb.active_session().unwrap();
    assert_eq!(session.stride_pc(), 0x2000);
    assert_eq!(session.chain(), &[0x2000]);
    assert!(!sb.is_register_tainted(p(5)));
    assert!(!sb.is_register_tainted(p(6)));
    assert!(sb.is_register_tainted(p(10)));
    assert_eq!(sb.stats().abandoned_sessions, 1);
    assert!(sb.completed_chains().is_empty());
}

#[test]
fn test_abandoned_session_leaves_no_ledger() {
    let host = host();
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), 0x1000, 16).unwrap();
    let _ = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 2));
    sb.seed_taint_with_value(&host, p(5), 0x2000, 16).unwrap();

    assert_eq!(sb.compute_steps_for(0x1000), None);
    assert_eq!(sb.recompute(0x1000, 1), None);
}

#[test]
fn test_stale_session_is_closed() {
    let host = host();
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), 0x1000, 16).unwrap();
    let _ = sb.propagate(&FakeInst::ld(0x1008, 7, 5, 0));
    assert!(sb.has_completed(0x1000));

    // The base completed; a new session for it cannot produce a chain.
    sb.seed_taint_with_value(&host, p(5), 0x1000, 16).unwrap();
    let out = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 2));
    assert_eq!(out, Propagation::StaleSession { base_pc: 0x1000 });
    assert!(sb.active_session().is_none());
    assert_eq!(sb.stats().stale_sessions, 1);
    assert_eq!(sb.stats().tainted_regs, 0);

    // Taint bits of the stale session are not consulted again.
    assert_eq!(
        sb.propagate(&FakeInst::ld(0x1010, 7, 5, 0)),
        Propagation::Idle
    );
    assert_eq!(sb.completed_chains().len(), 1);
}

#[test]
fn test_clear_all_taints_closes_session() {
    let host = host();
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), 0x1000, 16).unwrap();
    let _ = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 2));

    sb.clear_all_taints();
    assert!(sb.active_session().is_none());
    assert_eq!(sb.stats().tainted_regs, 0);
    assert_eq!(sb.shadow_value(p(6)), None);
}

#[test]
fn test_chain_closes_and_resets() {
    let host = host();
    let mut sb = TaintScoreboard::new(64);
    sb.seed_taint_with_value(&host, p(5), 0x1000, 16).unwrap();
    let _ = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 2));

    let out = sb.propagate(&FakeInst::ld(0x1008, 7, 6, 8));
    assert_eq!(
        out,
        Propagation::ChainClosed {
            base_pc: 0x1000,
            indirect_pc: 0x1008
        }
    );
    assert!(sb.active_session().is_none());
    assert_eq!(sb.stats().tainted_regs, 0);
    assert_eq!(sb.stats().detected_patterns, 1);
}
