use super::data_type::WikibaseDataType;
use super::errors::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

static PROPERTY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^P[1-9][0-9]*$").unwrap());

/// Kind of transformation applied to a column before it becomes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationType {
    Constant,
    Expression,
    Lookup,
}

/// Optional rule applied to a source column's raw cell values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    #[serde(rename = "type")]
    pub kind: TransformationType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, Value>>,
}

/// Identifies a source column of the tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub column_name: String,
    /// Native data type reported by the column registry (e.g. `VARCHAR`).
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<Transformation>,
}

impl ColumnMapping {
    pub fn new(column_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            transformation: None,
        }
    }

    #[must_use]
    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformation = Some(transformation);
        self
    }
}

/// A property as referenced from a statement, qualifier or reference snak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data_type: WikibaseDataType,
}

impl PropertyReference {
    pub fn new(id: impl Into<String>, data_type: WikibaseDataType) -> Self {
        Self {
            id: id.into(),
            label: None,
            data_type,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether `id` has the `P<number>` shape, without a leading zero.
    pub fn is_valid_id(id: &str) -> bool {
        PROPERTY_ID.is_match(id)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if Self::is_valid_id(&self.id) {
            Ok(())
        } else {
            Err(SchemaError::InvalidPropertyId(self.id.clone()))
        }
    }
}

/// Where a statement, qualifier or snak takes its value from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueMapping {
    Column {
        source: ColumnMapping,
        #[serde(rename = "dataType")]
        data_type: WikibaseDataType,
    },
    Constant {
        source: String,
        #[serde(rename = "dataType")]
        data_type: WikibaseDataType,
    },
    Expression {
        source: String,
        #[serde(rename = "dataType")]
        data_type: WikibaseDataType,
    },
}

impl ValueMapping {
    pub fn data_type(&self) -> WikibaseDataType {
        match self {
            ValueMapping::Column { data_type, .. }
            | ValueMapping::Constant { data_type, .. }
            | ValueMapping::Expression { data_type, .. } => *data_type,
        }
    }

    /// The source column, when the value is read from one.
    pub fn column(&self) -> Option<&ColumnMapping> {
        match self {
            ValueMapping::Column { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A single property-value pair; used for qualifiers and reference snaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakMapping {
    pub id: String,
    pub property: PropertyReference,
    pub value: ValueMapping,
}

pub type QualifierMapping = SnakMapping;
pub type ReferenceSnak = SnakMapping;

/// A set of snaks citing the source of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMapping {
    pub id: String,
    #[serde(default)]
    pub snaks: Vec<ReferenceSnak>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementRank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementMapping {
    pub id: String,
    pub property: PropertyReference,
    pub value: ValueMapping,
    #[serde(default)]
    pub rank: StatementRank,
    #[serde(default)]
    pub qualifiers: Vec<QualifierMapping>,
    #[serde(default)]
    pub references: Vec<ReferenceMapping>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_id_pattern() {
        assert!(PropertyReference::is_valid_id("P31"));
        assert!(PropertyReference::is_valid_id("P1"));
        assert!(!PropertyReference::is_valid_id("P0"));
        assert!(!PropertyReference::is_valid_id("P031"));
        assert!(!PropertyReference::is_valid_id("Q31"));
        assert!(!PropertyReference::is_valid_id("P31a"));
        assert!(matches!(
            PropertyReference::new("p31", WikibaseDataType::String).validate(),
            Err(SchemaError::InvalidPropertyId(_))
        ));
    }

    #[test]
    fn value_mapping_uses_type_tag() {
        let value = ValueMapping::Column {
            source: ColumnMapping::new("type_col", "VARCHAR"),
            data_type: WikibaseDataType::WikibaseItem,
        };
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({
                "type": "column",
                "source": { "columnName": "type_col", "dataType": "VARCHAR" },
                "dataType": "wikibase-item"
            })
        );

        let constant: ValueMapping = serde_json::from_value(json!({
            "type": "constant",
            "source": "Q5",
            "dataType": "wikibase-item"
        }))
        .unwrap();
        assert_eq!(constant.data_type(), WikibaseDataType::WikibaseItem);
        assert!(constant.column().is_none());
    }

    #[test]
    fn statement_defaults_when_fields_missing() {
        let statement: StatementMapping = serde_json::from_value(json!({
            "id": "s1",
            "property": { "id": "P31", "dataType": "wikibase-item" },
            "value": { "type": "constant", "source": "Q5", "dataType": "wikibase-item" }
        }))
        .unwrap();
        assert_eq!(statement.rank, StatementRank::Normal);
        assert!(statement.qualifiers.is_empty());
        assert!(statement.references.is_empty());
        assert_eq!(statement.property.label, None);
    }

    #[test]
    fn transformation_serializes_kind_as_type() {
        let column = ColumnMapping::new("born", "VARCHAR").with_transformation(Transformation {
            kind: TransformationType::Expression,
            value: "trim(value)".to_string(),
            parameters: None,
        });
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["transformation"]["type"], "expression");
        assert!(json["transformation"].get("parameters").is_none());
    }
}
