//! Log subscriber setup.
//!
//! The library emits `tracing` events everywhere; binaries call
//! [`init`] once at startup. Verbosity comes from `RUST_LOG`, with a
//! caller-supplied default filter when the variable is unset.

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
