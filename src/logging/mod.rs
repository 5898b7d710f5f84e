//! # Logging
//!
//! Thin layer over the `log` facade: feature-scoped targets and macros, plus
//! an `env_logger` initialiser driven by [`LogConfig`].

pub mod config;
pub mod features;

pub use config::{ConfigError, LogConfig};
pub use features::{LogFeature, PerformanceTimer};

use std::io::Write;

/// Initialize logging with the default configuration (plus environment overrides).
pub fn init() -> Result<(), LoggingError> {
    let config = LogConfig::from_env()?;
    init_with_config(&config)
}

/// Initialize logging from an explicit configuration.
///
/// `RUST_LOG`, when set, takes precedence over the configured levels.
pub fn init_with_config(config: &LogConfig) -> Result<(), LoggingError> {
    config.validate()?;

    let spec = std::env::var("RUST_LOG").unwrap_or_else(|_| config.filter_spec());
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&spec);
    builder.write_style(if config.enable_colors {
        env_logger::WriteStyle::Auto
    } else {
        env_logger::WriteStyle::Never
    });

    if !config.include_timestamp {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        });
    }

    builder
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

/// Logging system errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging system already initialized")]
    AlreadyInitialized,
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_rejected_before_install() {
        let config = LogConfig {
            default_level: "loud".to_string(),
            ..LogConfig::default()
        };
        assert!(matches!(
            init_with_config(&config),
            Err(LoggingError::ConfigError(_))
        ));
    }
}
