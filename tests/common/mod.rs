//! Shared helpers for integration tests.

use tracing_subscriber::EnvFilter;

/// Route library events to the test output; `RUST_LOG=biopatml=trace` shows
/// backtracking steps.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .with_test_writer()
        .try_init();
}
