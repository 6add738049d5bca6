//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise events at `level` and above are
/// emitted. Returns `false` when a global subscriber was already installed.
pub fn init_tracing(level: LogLevel) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string())),
        )
        .with_target(false)
        .try_init()
        .is_ok()
}
