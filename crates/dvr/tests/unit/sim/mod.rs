
/// Trace parsing.
pub mod trace;
