//! Taint scoreboard statistics collection and reporting.
//!
//! This module tracks what the scoreboard observed during a run. It provides:
//! 1. **Taint:** Live tainted registers, propagations and taint kills.
//! 2. **Sessions:** Accepted and rejected seeds, abandoned and stale sessions.
//! 3. **Chains:** Detected patterns and compute steps written to the ledger.

use std::fmt::Write as _;

use serde::Serialize;

/// Scoreboard statistics.
///
/// Returned by value from `TaintScoreboard::stats`; `tainted_regs` is a
/// snapshot of the taint table at that moment, every other field is a
/// running counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaintStats {
    /// Registers currently tainted.
    pub tainted_regs: usize,
    /// Times taint moved from a tainted source to a destination register.
    pub propagations: u64,
    /// Times a tainted register was overwritten by an untainted computation.
    pub taint_kills: u64,
    /// Chains closed by an indirect load.
    pub detected_patterns: u64,

    /// Seeds accepted.
    pub seeds: u64,
    /// Seeds rejected (bad register or non-stride PC).
    pub rejected_seeds: u64,
    /// Open sessions replaced by a new seed before they closed.
    pub abandoned_sessions: u64,
    /// Sessions closed because their base PC had already completed.
    pub stale_sessions: u64,

    /// Compute steps written to the ledger.
    pub recorded_steps: u64,
}

impl TaintStats {
    /// Renders the selected report sections.
    ///
    /// Recognised sections are `summary`, `taint`, `sessions` and `ledger`.
    /// An empty slice selects all of them.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        if want("summary") {
            let _ = writeln!(out, "\n==========================================================");
            let _ = writeln!(out, "DEPENDENCY CHAIN TRACKER STATISTICS");
            let _ = writeln!(out, "==========================================================");
            let _ = writeln!(out, "chains.detected          {}", self.detected_patterns);
            let _ = writeln!(out, "taint.live_regs          {}", self.tainted_regs);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("taint") {
            let _ = writeln!(out, "TAINT");
            let _ = writeln!(out, "  propagations           {}", self.propagations);
            let _ = writeln!(out, "  kills                  {}", self.taint_kills);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("sessions") {
            let seeded = self.seeds.max(1);
            let _ = writeln!(out, "SESSIONS");
            let _ = writeln!(out, "  seeds                  {}", self.seeds);
            let _ = writeln!(out, "  seeds.rejected         {}", self.rejected_seeds);
            let _ = writeln!(
                out,
                "  abandoned              {} ({:.2}%)",
                self.abandoned_sessions,
                (self.abandoned_sessions as f64 / seeded as f64) * 100.0
            );
            let _ = writeln!(out, "  stale                  {}", self.stale_sessions);
            let _ = writeln!(
                out,
                "  completion_rate        {:.2}%",
                (self.detected_patterns as f64 / seeded as f64) * 100.0
            );
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("ledger") {
            let chains = self.detected_patterns.max(1);
            let _ = writeln!(out, "LEDGER");
            let _ = writeln!(out, "  steps.recorded         {}", self.recorded_steps);
            let _ = writeln!(
                out,
                "  steps_per_chain        {:.2}",
                self.recorded_steps as f64 / chains as f64
            );
            let _ = writeln!(out, "==========================================================");
        }
        out
    }

    /// Prints the selected report sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints the full report.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
