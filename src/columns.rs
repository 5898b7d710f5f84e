//! Column registry contract: what the tabular dataset tells us about its columns.

use crate::schema::types::ColumnMapping;
use serde::{Deserialize, Serialize};

/// A column of the active dataset as reported by the column registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    /// Native type name, e.g. `VARCHAR` or `INTEGER`. Compared case-insensitively.
    pub data_type: String,
    #[serde(default)]
    pub sample_values: Vec<String>,
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            sample_values: Vec::new(),
            nullable: false,
        }
    }

    /// The mapping recorded in the schema when this column is dropped.
    pub fn to_mapping(&self) -> ColumnMapping {
        ColumnMapping::new(self.name.clone(), self.data_type.clone())
    }
}

/// Source of the active dataset's column metadata.
pub trait ColumnRegistry {
    fn columns(&self) -> Vec<ColumnInfo>;

    fn column(&self, name: &str) -> Option<ColumnInfo> {
        self.columns().into_iter().find(|c| c.name == name)
    }
}

/// Registry over a fixed list of columns, typically deserialized from the
/// dataset import step.
#[derive(Debug, Clone, Default)]
pub struct StaticColumnRegistry {
    columns: Vec<ColumnInfo>,
}

impl StaticColumnRegistry {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

impl ColumnRegistry for StaticColumnRegistry {
    fn columns(&self) -> Vec<ColumnInfo> {
        self.columns.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_registry_contract() {
        let registry = StaticColumnRegistry::from_json(
            r#"[
                {"name": "title", "dataType": "VARCHAR", "sampleValues": ["Dune"], "nullable": false},
                {"name": "pages", "dataType": "INTEGER", "sampleValues": [], "nullable": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.columns().len(), 2);
        let pages = registry.column("pages").unwrap();
        assert!(pages.nullable);
        assert_eq!(pages.to_mapping(), ColumnMapping::new("pages", "INTEGER"));
        assert!(registry.column("missing").is_none());
    }
}
