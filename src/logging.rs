//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout carries only command results. `RUST_LOG`
//! overrides the level picked from `-v` flags.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default level.
#[must_use]
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
