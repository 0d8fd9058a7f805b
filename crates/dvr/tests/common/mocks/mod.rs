//! Host controller doubles.

/// Hand-written fake and `mockall` mock of `CoreController`.
pub mod host;

pub use host::{FakeHost, MockHost};
