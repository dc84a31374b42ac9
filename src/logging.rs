//! Logging configuration using tracing
//!
//! Log lines go to stderr so they never mix with command output on stdout.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a `-v` count.
///
/// 0 → `warn`, 1 → `info`, 2 → `debug`, 3 and above → `trace`.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set (e.g. `RUST_LOG=gitsync=trace`); otherwise the
/// filter comes from [`default_directive`].
///
/// # Errors
/// Returns an error if a global subscriber has already been installed.
pub fn init(verbosity: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("failed to initialize tracing")
}
