//! # Wikibase Schema Mapping Library
//!
//! Maps columns of a tabular dataset onto Wikibase items: multilingual terms
//! plus property-value statements with qualifiers and references.
//!
//! ## Core Components
//!
//! * `schema` - Mapping model, mutation store, builders and persistence
//! * `validation` - Result types and the drag-and-drop compatibility validator
//! * `constraints` - Property constraint lookup, caching and evaluation
//! * `columns` - Column registry contract
//! * `config` - Configuration loaded from TOML or the environment
//! * `logging` - Feature-scoped logging on top of `log` and `env_logger`
//! * `error` - Error types and handling
//!
//! ## Architecture
//!
//! A schema is edited one mutation at a time through [`SchemaStore`], which
//! marks itself dirty until a [`SchemaSession`] writes it back through a
//! [`SchemaPersistence`] gateway. Drops from the UI are checked by the
//! [`CompatibilityValidator`] before they reach the store.
//!
//! The [`ConstraintValidationService`] is independent of the store: it checks
//! candidate values against the constraints a knowledge base declares, and
//! always answers with a [`ValidationResult`], reporting lookup failures as
//! `system_error` violations.

pub mod columns;
pub mod config;
pub mod constraints;
pub mod error;
pub mod logging;
pub mod schema;
pub mod testing;
pub mod validation;

// Re-export main types for convenience
pub use columns::{ColumnInfo, ColumnRegistry, StaticColumnRegistry};
pub use config::MapperConfig;
pub use constraints::{
    ConstraintKind, ConstraintValidationService, HttpKnowledgeBaseClient, KnowledgeBaseClient,
    PropertyConstraint,
};
pub use error::{MapperError, MapperResult};
pub use schema::{
    ItemSchemaMapping, SchemaPersistence, SchemaSession, SchemaStore, StatementRank,
    WikibaseDataType,
};
pub use validation::{CompatibilityValidator, DropTarget, ValidationError, ValidationResult};
