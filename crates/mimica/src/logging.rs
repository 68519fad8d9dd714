//! Test logging setup.
//!
//! Dispatch and verification emit `tracing` events (`trace` per matched call,
//! `debug` for fallbacks and registrations, `warn` for strict misses). Call
//! [`init_test_logging`] at the top of a test to see them:
//!
//! ```bash
//! MIMICA_LOG=mimica=trace cargo test -- --nocapture
//! ```

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "MIMICA_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Install a fmt subscriber writing through the test harness.
///
/// Returns `false` if a global subscriber was already installed, which makes
/// repeated calls from several tests harmless.
pub fn init_test_logging() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(true)
        .try_init()
        .is_ok()
}
