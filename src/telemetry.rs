//! Tracing subscriber setup.
//!
//! Build stages emit `tracing` events directly; this module only wires a
//! subscriber for binaries and tests that want console output. Library
//! callers embedding the crate install their own subscriber instead.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a console subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` when the variable is unset. Safe to call more than
/// once; later calls are no-ops.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
