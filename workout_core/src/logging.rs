//! Tracing setup for FitTrack hosts.
//!
//! The engine reports its soft failures through `tracing` rather than return
//! values: an unreadable session snapshot, a snapshot write that failed, a
//! history line that could not be parsed. Hosts install a subscriber once at
//! startup so those warnings reach the user. Everything goes to stderr,
//! leaving stdout to the host's own output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for the `fittrack` CLI: only persistence warnings and errors
pub const CLI_DEFAULT_LEVEL: &str = "warn";

/// Install the subscriber used by the `fittrack` CLI
///
/// `RUST_LOG` still wins, e.g. `RUST_LOG=workout_core=debug` shows every
/// ignored state-machine call and snapshot save.
pub fn init_cli() {
    init_with_level(CLI_DEFAULT_LEVEL)
}

/// Install a compact stderr subscriber with `default_level` unless `RUST_LOG`
/// is set
///
/// Embedding apps with a UI typically pass "info" here.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
