//! # Configuration
//!
//! Crate-wide settings loaded from a TOML file and/or `WIKIBASE_SCHEMA_*`
//! environment variables.

use crate::logging::config::prefixed_env_vars;
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Default API endpoint for the `wikidata` instance.
pub const WIKIDATA_API_URL: &str = "https://www.wikidata.org/w/api.php";

/// Property that declares constraints on Wikidata ("property constraint").
pub const DEFAULT_CONSTRAINT_PROPERTY: &str = "P2302";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub knowledge_base: KnowledgeBaseConfig,
    pub constraints: ConstraintConfig,
    pub logging: LogConfig,
}

/// Where and how to reach Wikibase instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Instance id → `api.php` URL.
    pub instances: BTreeMap<String, String>,
    /// Timeout for API calls in seconds
    pub timeout_seconds: u64,
    /// Maximum number of attempts per entity lookup
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        let mut instances = BTreeMap::new();
        instances.insert("wikidata".to_string(), WIKIDATA_API_URL.to_string());
        Self {
            instances,
            timeout_seconds: 30,
            max_retries: 3,
            user_agent: format!("wikibase_schema/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl KnowledgeBaseConfig {
    pub fn api_url(&self, instance_id: &str) -> Option<&str> {
        self.instances.get(instance_id).map(String::as_str)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    /// How long fetched constraints stay cached, in milliseconds.
    pub cache_ttl_ms: u64,
    /// Property whose statements declare constraints.
    pub constraint_property: String,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 5 * 60 * 1000,
            constraint_property: DEFAULT_CONSTRAINT_PROPERTY.to_string(),
        }
    }
}

impl ConstraintConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

impl MapperConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: MapperConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// `WIKIBASE_SCHEMA_INSTANCE_<ID>=<url>` registers or replaces an instance.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(timeout) = env::var("WIKIBASE_SCHEMA_TIMEOUT_SECONDS") {
            self.knowledge_base.timeout_seconds =
                timeout.parse().unwrap_or(self.knowledge_base.timeout_seconds);
        }
        if let Ok(retries) = env::var("WIKIBASE_SCHEMA_MAX_RETRIES") {
            self.knowledge_base.max_retries =
                retries.parse().unwrap_or(self.knowledge_base.max_retries);
        }
        if let Ok(agent) = env::var("WIKIBASE_SCHEMA_USER_AGENT") {
            self.knowledge_base.user_agent = agent;
        }
        if let Ok(ttl) = env::var("WIKIBASE_SCHEMA_CACHE_TTL_MS") {
            self.constraints.cache_ttl_ms = ttl.parse().unwrap_or(self.constraints.cache_ttl_ms);
        }
        if let Ok(property) = env::var("WIKIBASE_SCHEMA_CONSTRAINT_PROPERTY") {
            self.constraints.constraint_property = property;
        }

        for (instance, url) in prefixed_env_vars("WIKIBASE_SCHEMA_INSTANCE_") {
            self.knowledge_base
                .instances
                .insert(instance.to_lowercase(), url);
        }

        self.logging.apply_env_overrides();
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.knowledge_base.instances.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one Wikibase instance is required".to_string(),
            ));
        }
        for (id, url) in &self.knowledge_base.instances {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "Instance '{}' has an invalid API URL: {}",
                    id, url
                )));
            }
        }
        if self.knowledge_base.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.knowledge_base.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_seconds must be positive".to_string(),
            ));
        }
        if !crate::schema::PropertyReference::is_valid_id(&self.constraints.constraint_property) {
            return Err(ConfigError::Invalid(format!(
                "constraint_property '{}' is not a property id",
                self.constraints.constraint_property
            )));
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Logging configuration error: {0}")]
    Logging(#[from] crate::logging::ConfigError),
}
