//! Unified error type for callers that drive several components at once.
//!
//! Each component keeps its own error enum; this module only aggregates
//! them. Constraint *violations* are never errors: they are returned as
//! [`ValidationResult`](crate::validation::ValidationResult) data.

use crate::config::ConfigError;
use crate::constraints::ConstraintError;
use crate::logging::LoggingError;
use crate::schema::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Constraint lookup error: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

/// Result type for operations spanning several components
pub type MapperResult<T> = Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn open_missing() -> MapperResult<()> {
        Err(SchemaError::NotFound("city".to_string()))?;
        Ok(())
    }

    #[test]
    fn component_errors_convert() {
        let err = open_missing().unwrap_err();
        assert!(matches!(err, MapperError::Schema(SchemaError::NotFound(_))));

        let err: MapperError = ConstraintError::api("maxlag").into();
        assert_eq!(err.to_string(), "Constraint lookup error: Wikibase API error: maxlag");
    }
}
