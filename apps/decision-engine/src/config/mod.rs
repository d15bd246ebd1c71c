//! Configuration module for the decision core.
//!
//! Provides configuration loading with serde field defaults, so an empty
//! file (or no file at all) yields the documented default policy.
//!
//! # Usage
//!
//! ```rust,ignore
//! use decision_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```

mod advisory;
mod checks;
mod execution;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use advisory::AdvisoryConfig;
pub use checks::ChecksConfig;
pub use execution::ExecutionConfig;

/// Default configuration file path.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Check thresholds.
    #[serde(default)]
    pub checks: ChecksConfig,
    /// Advisory review boundary.
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    /// Execution controls.
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl Config {
    /// Validate cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending
    /// field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checks.min_risk_reward <= 0.0 {
            return Err(ConfigError::ValidationError(
                "checks.min_risk_reward must be positive".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.checks.min_confidence) {
            return Err(ConfigError::ValidationError(
                "checks.min_confidence must be within 0..=100".to_string(),
            ));
        }
        if self.checks.max_daily_risk_pct <= 0.0 {
            return Err(ConfigError::ValidationError(
                "checks.max_daily_risk_pct must be positive".to_string(),
            ));
        }
        if self.checks.max_volatility_pct <= 0.0 {
            return Err(ConfigError::ValidationError(
                "checks.max_volatility_pct must be positive".to_string(),
            ));
        }
        if self.advisory.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "advisory.timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or
/// fails validation.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_string(),
        source,
    })?;
    let config: Config = serde_yaml_bw::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
