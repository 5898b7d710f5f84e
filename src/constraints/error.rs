//! Error types for the constraint validation service

use thiserror::Error;

/// Errors raised while fetching or parsing constraint declarations.
///
/// These never reach callers of the validation methods, which convert them
/// into `system_error` violations.
#[derive(Error, Debug)]
pub enum ConstraintError {
    /// Wraps any lookup failure with the property it was for
    #[error("Failed to fetch constraints for property {property_id}: {source}")]
    Fetch {
        property_id: String,
        #[source]
        source: Box<ConstraintError>,
    },

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with an error object or an unexpected status
    #[error("Wikibase API error: {0}")]
    Api(String),

    #[error("Unknown Wikibase instance: {0}")]
    UnknownInstance(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// The HTTP client could not be configured
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ConstraintError {
    pub fn fetch(property_id: impl Into<String>, source: ConstraintError) -> Self {
        Self::Fetch {
            property_id: property_id.into(),
            source: Box::new(source),
        }
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }
}

/// Result type for constraint lookups
pub type ConstraintResult<T> = Result<T, ConstraintError>;
