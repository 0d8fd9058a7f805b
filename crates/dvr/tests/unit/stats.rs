//! # Statistics Tests
//!
//! Counters gathered by the scoreboard and the rendered report.

use dvr_core::{TaintScoreboard, TaintStats};

use crate::common::builder::FakeInst;
use crate::common::mocks::FakeHost;
use crate::common::p;

#[test]
fn test_counters_over_a_run() {
    let host = FakeHost::with_strides(&[0x1000, 0x2000]);
    let mut sb = TaintScoreboard::new(64);

    let _ = sb.seed_taint_with_value(&host, p(5), 0x1000, 1);
    let _ = sb.seed_taint_with_value(&host, p(5), 0x2000, 1);
    let _ = sb.seed_taint_with_value(&host, p(5), 0x3000, 1);
    let _ = sb.propagate(&FakeInst::slli(0x2004, 6, 5, 1));
    let _ = sb.propagate(&FakeInst::addi(0x2008, 6, 9, 0));
    let _ = sb.propagate(&FakeInst::ld(0x200c, 7, 5, 0));

    let stats = sb.stats();
    assert_eq!(
        stats,
        TaintStats {
            tainted_regs: 0,
            propagations: 2,
            taint_kills: 1,
            detected_patterns: 1,
            seeds: 2,
            rejected_seeds: 1,
            abandoned_sessions: 1,
            stale_sessions: 0,
            recorded_steps: 2,
        }
    );
}

#[test]
fn test_live_tainted_count() {
    let host = FakeHost::with_strides(&[0x1000]);
    let mut sb = TaintScoreboard::new(64);
    let _ = sb.seed_taint_with_value(&host, p(5), 0x1000, 1);
    let _ = sb.propagate(&FakeInst::slli(0x1004, 6, 5, 1));
    let _ = sb.propagate(&FakeInst::slli(0x1008, 7, 5, 1));
    assert_eq!(sb.stats().tainted_regs, 3);
}

#[test]
fn test_report_rates() {
    let stats = TaintStats {
        seeds: 4,
        abandoned_sessions: 1,
        detected_patterns: 2,
        ..TaintStats::default()
    };
    let report = stats.render_sections(&["sessions".to_string()]);
    assert!(report.contains("abandoned              1 (25.00%)"));
    assert!(report.contains("completion_rate        50.00%"));
    assert!(!report.contains("LEDGER"));
}

#[test]
fn test_stats_serialize() {
    let json = serde_json::to_value(TaintStats::default()).unwrap();
    assert_eq!(json["detected_patterns"], 0);
    assert_eq!(json["tainted_regs"], 0);
}
