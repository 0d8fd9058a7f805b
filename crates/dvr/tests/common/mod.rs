//! Shared test infrastructure.

/// Instruction encoders and dynamic instruction builders.
pub mod builder;

/// Host controller fakes and mocks.
pub mod mocks;

use dvr_core::PhysRegId;

/// Shorthand for an integer physical register.
pub const fn p(index: usize) -> PhysRegId {
    PhysRegId::int(index)
}

/// Routes scoreboard logs to the test harness at `debug` level.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
