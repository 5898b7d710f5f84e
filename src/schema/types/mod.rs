pub mod data_type;
pub mod errors;
pub mod mapping;
pub mod terms;

pub use data_type::WikibaseDataType;
pub use errors::SchemaError;
pub use mapping::{
    ColumnMapping, PropertyReference, QualifierMapping, ReferenceMapping, ReferenceSnak,
    SnakMapping, StatementMapping, StatementRank, Transformation, TransformationType,
    ValueMapping,
};
pub use terms::{ItemSchemaMapping, TermsMapping};
