use thiserror::Error;

/// Errors raised by the schema model, builder and persistence gateway.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Malformed schema JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid property id: {0}")]
    InvalidPropertyId(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl SchemaError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
