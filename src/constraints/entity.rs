//! The subset of a Wikibase entity record consumed by this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermValue {
    pub language: String,
    pub value: String,
}

/// An entity as returned by `wbgetentities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    /// Value data type; only present on properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, TermValue>,
    #[serde(default)]
    pub descriptions: HashMap<String, TermValue>,
    #[serde(default)]
    pub aliases: HashMap<String, Vec<TermValue>>,
    #[serde(default)]
    pub claims: HashMap<String, Vec<Claim>>,
}

impl EntityRecord {
    /// Label in `language`, falling back to English.
    pub fn label(&self, language: &str) -> Option<&str> {
        self.labels
            .get(language)
            .or_else(|| self.labels.get("en"))
            .map(|t| t.value.as_str())
    }

    pub fn claims_for(&self, property_id: &str) -> &[Claim] {
        self.claims
            .get(property_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub mainsnak: Snak,
    #[serde(default)]
    pub qualifiers: HashMap<String, Vec<Snak>>,
    #[serde(default = "default_rank")]
    pub rank: String,
}

fn default_rank() -> String {
    "normal".to_string()
}

impl Claim {
    pub fn qualifier_snaks(&self, property_id: &str) -> &[Snak] {
        self.qualifiers
            .get(property_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_deprecated(&self) -> bool {
        self.rank == "deprecated"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snak {
    pub snaktype: String,
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datavalue: Option<DataValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: String,
}

impl Snak {
    /// Entity id of a `wikibase-entityid` value, e.g. `Q5`.
    pub fn entity_id(&self) -> Option<String> {
        let value = &self.datavalue.as_ref()?.value;
        if let Some(id) = value.get("id").and_then(Value::as_str) {
            return Some(id.to_string());
        }
        let numeric = value.get("numeric-id").and_then(Value::as_u64)?;
        let prefix = match value.get("entity-type").and_then(Value::as_str) {
            Some("property") => 'P',
            _ => 'Q',
        };
        Some(format!("{}{}", prefix, numeric))
    }

    pub fn string_value(&self) -> Option<&str> {
        self.datavalue.as_ref()?.value.as_str()
    }

    /// Amount of a `quantity` value. Wikibase encodes amounts as signed strings (`"+42"`).
    pub fn quantity_amount(&self) -> Option<f64> {
        let amount = self.datavalue.as_ref()?.value.get("amount")?;
        match amount {
            Value::String(s) => s.trim_start_matches('+').parse().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

/// Envelope of a `wbgetentities` response.
#[derive(Debug, Deserialize)]
pub(crate) struct GetEntitiesResponse {
    #[serde(default)]
    pub entities: HashMap<String, Value>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_property_record() {
        let record: EntityRecord = serde_json::from_value(json!({
            "id": "P1082",
            "datatype": "quantity",
            "labels": { "en": { "language": "en", "value": "population" } },
            "claims": {
                "P2302": [{
                    "mainsnak": {
                        "snaktype": "value",
                        "property": "P2302",
                        "datavalue": {
                            "value": { "entity-type": "item", "numeric-id": 21510860 },
                            "type": "wikibase-entityid"
                        }
                    },
                    "qualifiers": {
                        "P2313": [{
                            "snaktype": "value",
                            "property": "P2313",
                            "datavalue": { "value": { "amount": "+0", "unit": "1" }, "type": "quantity" }
                        }]
                    },
                    "rank": "normal"
                }]
            }
        }))
        .unwrap();

        assert_eq!(record.label("de"), Some("population"));
        let claim = &record.claims_for("P2302")[0];
        assert_eq!(claim.mainsnak.entity_id().as_deref(), Some("Q21510860"));
        assert_eq!(claim.qualifier_snaks("P2313")[0].quantity_amount(), Some(0.0));
        assert!(record.claims_for("P31").is_empty());
    }

    #[test]
    fn snak_without_value() {
        let snak: Snak = serde_json::from_value(json!({
            "snaktype": "somevalue",
            "property": "P2305"
        }))
        .unwrap();
        assert_eq!(snak.entity_id(), None);
        assert_eq!(snak.string_value(), None);
    }
}
