//! Deployment configuration.
//!
//! Values come from defaults, an optional JSON file, and finally
//! `DIVPOOL_*` environment variables, in that order of precedence (env wins).

use std::path::Path;

use divpool_core::constants::{DEFAULT_MINIMUM_STAKE, DEFAULT_UNSTAKE_DELAY_SECS, MAX_UNSTAKE_DELAY_SECS};
use divpool_core::error::ConfigError;
use divpool_core::types::Amount;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`StakingConfig::minimum_stake`].
pub const ENV_MINIMUM_STAKE: &str = "DIVPOOL_MINIMUM_STAKE";
/// Environment variable overriding [`StakingConfig::unstake_delay_secs`].
pub const ENV_UNSTAKE_DELAY_SECS: &str = "DIVPOOL_UNSTAKE_DELAY_SECS";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct StakingConfig {
    /// Smallest accepted stake, in base units.
    pub minimum_stake: Amount,
    /// Seconds an unstaked payout stays locked.
    pub unstake_delay_secs: u64,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            minimum_stake: DEFAULT_MINIMUM_STAKE,
            unstake_delay_secs: DEFAULT_UNSTAKE_DELAY_SECS,
        }
    }
}

impl StakingConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a JSON file, apply environment overrides, then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_json(&raw)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults plus overrides read through `lookup`, validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DIVPOOL_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MINIMUM_STAKE) {
            self.minimum_stake = parse_var(ENV_MINIMUM_STAKE, &value)?;
        }
        if let Some(value) = lookup(ENV_UNSTAKE_DELAY_SECS) {
            self.unstake_delay_secs = parse_var(ENV_UNSTAKE_DELAY_SECS, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_stake == 0 {
            return Err(ConfigError::Invalid("minimum_stake must be positive".into()));
        }
        if self.unstake_delay_secs == 0 {
            return Err(ConfigError::Invalid("unstake_delay_secs must be positive".into()));
        }
        if self.unstake_delay_secs > MAX_UNSTAKE_DELAY_SECS {
            return Err(ConfigError::Invalid(format!(
                "unstake_delay_secs {} exceeds maximum {MAX_UNSTAKE_DELAY_SECS}",
                self.unstake_delay_secs
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}
