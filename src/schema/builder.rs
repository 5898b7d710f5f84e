//! Pure constructors for mapping records, and conversion of an
//! [`ItemSchemaMapping`] to and from its persisted JSON form.
//!
//! Nothing here validates its input; compatibility checks belong to
//! [`crate::validation`].

use super::types::{
    ColumnMapping, ItemSchemaMapping, PropertyReference, QualifierMapping, ReferenceMapping,
    ReferenceSnak, SchemaError, SnakMapping, StatementMapping, StatementRank, TermsMapping,
    ValueMapping, WikibaseDataType,
};
use uuid::Uuid;

/// Generates a fresh identifier for a statement, qualifier, reference or snak.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds a statement with a freshly generated id.
pub fn build_statement(
    property: PropertyReference,
    value: ValueMapping,
    rank: StatementRank,
    qualifiers: Vec<QualifierMapping>,
    references: Vec<ReferenceMapping>,
) -> StatementMapping {
    StatementMapping {
        id: generate_id(),
        property,
        value,
        rank,
        qualifiers,
        references,
    }
}

pub fn build_qualifier(property: PropertyReference, value: ValueMapping) -> QualifierMapping {
    SnakMapping {
        id: generate_id(),
        property,
        value,
    }
}

pub fn build_reference_snak(property: PropertyReference, value: ValueMapping) -> ReferenceSnak {
    SnakMapping {
        id: generate_id(),
        property,
        value,
    }
}

pub fn build_reference(snaks: Vec<ReferenceSnak>) -> ReferenceMapping {
    ReferenceMapping {
        id: generate_id(),
        snaks,
    }
}

pub fn build_column_value(column: ColumnMapping, data_type: WikibaseDataType) -> ValueMapping {
    ValueMapping::Column {
        source: column,
        data_type,
    }
}

pub fn build_constant_value(text: impl Into<String>, data_type: WikibaseDataType) -> ValueMapping {
    ValueMapping::Constant {
        source: text.into(),
        data_type,
    }
}

pub fn build_expression_value(
    expression: impl Into<String>,
    data_type: WikibaseDataType,
) -> ValueMapping {
    ValueMapping::Expression {
        source: expression.into(),
        data_type,
    }
}

pub fn build_item_schema(terms: TermsMapping, statements: Vec<StatementMapping>) -> ItemSchemaMapping {
    ItemSchemaMapping {
        id: None,
        terms,
        statements,
    }
}

pub fn create_empty_schema() -> ItemSchemaMapping {
    ItemSchemaMapping::default()
}

/// Parses a persisted schema, reporting why parsing failed.
pub fn try_parse_schema(raw: &str) -> Result<ItemSchemaMapping, SchemaError> {
    Ok(serde_json::from_str(raw)?)
}

/// Parses a persisted schema, falling back to the empty schema on malformed input.
///
/// The fallback keeps the editor usable; the failure is logged so corrupted
/// stored schemas still show up in diagnostics.
pub fn parse_schema(raw: &str) -> ItemSchemaMapping {
    match try_parse_schema(raw) {
        Ok(schema) => schema,
        Err(e) => {
            crate::log_schema_warn!(
                "Failed to parse persisted schema ({} bytes), using empty schema: {}",
                raw.len(),
                e
            );
            create_empty_schema()
        }
    }
}

/// Serializes a schema to its canonical persisted JSON.
pub fn serialize_schema(schema: &ItemSchemaMapping) -> String {
    // Every field is a plain string, enum or map with string keys, so this cannot fail.
    serde_json::to_string(schema).unwrap_or_else(|_| String::from("{}"))
}
