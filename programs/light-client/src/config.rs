//! The JSON config file of the command line.

use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use ibc_lc_tendermint_types::TrustThreshold;
use ibc_lc_tendermint_update_client::validate_commit_threshold;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

/// Settings read from the config file
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log level, one of `trace`, `debug`, `info`, `warn` or `error`
    pub log_level: String,
    /// Fraction of the header's validator set that must sign its commit, at least 2/3
    #[serde_as(as = "DisplayFromStr")]
    pub commit_threshold: TrustThreshold,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            commit_threshold: TrustThreshold::TWO_THIRDS,
        }
    }
}

impl Config {
    /// Reads the config at `path`, or the defaults when no path is given
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid config
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let bytes =
            fs::read(path).with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.level()?;
        validate_commit_threshold(config.commit_threshold)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// The configured log level
    /// # Errors
    /// Returns an error if the level is not a known level
    pub fn level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log level {}", self.log_level))
    }
}
