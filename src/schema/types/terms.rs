use super::mapping::{ColumnMapping, StatementMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column mappings for an item's multilingual terms, keyed by language code.
///
/// Labels and descriptions hold one mapping per language; aliases hold an
/// ordered list per language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsMapping {
    pub labels: BTreeMap<String, ColumnMapping>,
    pub descriptions: BTreeMap<String, ColumnMapping>,
    pub aliases: BTreeMap<String, Vec<ColumnMapping>>,
}

impl TermsMapping {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.descriptions.is_empty() && self.aliases.is_empty()
    }
}

/// The full mapping of dataset columns onto one Wikibase item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSchemaMapping {
    /// Existing item the mapping edits, if any (e.g. `Q42`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub terms: TermsMapping,
    #[serde(default)]
    pub statements: Vec<StatementMapping>,
}
