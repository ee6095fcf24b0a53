//! Logging setup for the command line.
//!
//! Logs go to stderr so that the JSON printed on stdout can be piped.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::Config;

/// Installs the global subscriber at the configured level
/// # Errors
/// Returns an error if the level is invalid or a subscriber is already installed
pub fn init_subscriber(config: &Config) -> Result<()> {
    let level = config.level()?;
    Registry::default()
        .with(EnvFilter::new(level.as_str().to_lowercase()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to set global default subscriber")
}
