//! Internal helpers re-exported for integration tests.
//!
//! The logging helpers install a scoped `tracing` subscriber so tests can
//! assert on the warnings and events emitted while caches are switched.

mod logging;

pub use logging::{capture_info_logs, capture_warn_logs};
