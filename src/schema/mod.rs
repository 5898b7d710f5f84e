//! # Schema
//!
//! The item schema mapping: its types, the editable store, pure builders and
//! the persistence gateway.

pub mod builder;
pub mod drops;
pub mod persistence;
pub mod store;
pub mod types;

pub use builder::{create_empty_schema, parse_schema, serialize_schema};
pub use drops::apply_column_drop;
pub use persistence::{
    InMemoryPersistence, RecoveredSchema, SchemaPersistence, SchemaSession, SledPersistence,
};
pub use store::SchemaStore;
pub use types::{
    ColumnMapping, ItemSchemaMapping, PropertyReference, QualifierMapping, ReferenceMapping,
    ReferenceSnak, SchemaError, StatementMapping, StatementRank, TermsMapping, ValueMapping,
    WikibaseDataType,
};
