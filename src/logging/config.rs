//! Configuration management for the logging system
//!
//! Handles loading logging configuration from TOML files and environment
//! variables, and turning it into an `env_logger` filter specification.

use super::features::LogFeature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

const VALID_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Main logging configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level for all modules
    pub default_level: String,
    /// Enable colored output
    pub enable_colors: bool,
    /// Include timestamps in console output
    pub include_timestamp: bool,
    /// Feature-specific log levels
    pub features: HashMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "INFO".to_string(),
            enable_colors: true,
            include_timestamp: true,
            features: Self::default_features(),
        }
    }
}

impl LogConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let mut config: LogConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("WIKIBASE_SCHEMA_LOG_LEVEL") {
            self.default_level = level.to_uppercase();
        }
        if let Ok(colors) = std::env::var("WIKIBASE_SCHEMA_LOG_COLORS") {
            self.enable_colors = colors.parse().unwrap_or(true);
        }

        for (feature, value) in prefixed_env_vars("WIKIBASE_SCHEMA_LOG_FEATURE_") {
            self.features
                .insert(feature.to_lowercase(), value.to_uppercase());
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LEVELS.contains(&self.default_level.as_str()) {
            return Err(ConfigError::InvalidLevel(self.default_level.clone()));
        }

        for (feature, level) in &self.features {
            if LogFeature::from_config_key(feature).is_none() {
                return Err(ConfigError::UnknownFeature(feature.clone()));
            }
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidFeatureLevel(
                    feature.clone(),
                    level.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Build an `env_logger` filter string, e.g. `info,wikibase_schema::constraints=debug`.
    ///
    /// Features are emitted in a fixed order so the result is stable.
    pub fn filter_spec(&self) -> String {
        let mut spec = self.default_level.to_lowercase();
        for feature in LogFeature::ALL {
            if let Some(level) = self.features.get(feature.config_key()) {
                spec.push_str(&format!(",{}={}", feature.target(), level.to_lowercase()));
            }
        }
        spec
    }

    /// Get default feature-specific log levels
    fn default_features() -> HashMap<String, String> {
        let mut features = HashMap::new();
        features.insert("schema".to_string(), "INFO".to_string());
        features.insert("validation".to_string(), "WARN".to_string());
        features.insert("constraints".to_string(), "INFO".to_string());
        features.insert("persistence".to_string(), "INFO".to_string());
        features
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Invalid log level for feature '{0}': {1}")]
    InvalidFeatureLevel(String, String),
    #[error("Unknown logging feature: {0}")]
    UnknownFeature(String),
}

/// Environment variables whose name starts with `prefix`, with the prefix stripped.
pub(crate) fn prefixed_env_vars(prefix: &str) -> Vec<(String, String)> {
    prefixed_vars(std::env::vars_os(), prefix)
}

/// Entries that are not valid UTF-8 are skipped.
fn prefixed_vars<I>(vars: I, prefix: &str) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            let value = value.into_string().ok()?;
            let suffix = key.strip_prefix(prefix)?;
            Some((suffix.to_string(), value))
        })
        .collect()
}
