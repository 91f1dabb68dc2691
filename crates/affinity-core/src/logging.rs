//! Tracing subscriber setup for binaries and tools embedding the core.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the embedding program.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Builds the filter: `RUST_LOG` when set, otherwise the configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs a global registry with an env filter and a fmt layer.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing one is kept.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let installed = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(config.with_target)
                .with_ansi(config.ansi),
        )
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level = %config.level, "Tracing initialised");
    }
    installed
}
