use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value data types a Wikibase property can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WikibaseDataType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "wikibase-item")]
    WikibaseItem,
    #[serde(rename = "wikibase-property")]
    WikibaseProperty,
    #[serde(rename = "quantity")]
    Quantity,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "globe-coordinate")]
    GlobeCoordinate,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "external-id")]
    ExternalId,
    #[serde(rename = "monolingualtext")]
    MonolingualText,
    #[serde(rename = "commonsMedia")]
    CommonsMedia,
}

impl WikibaseDataType {
    pub const ALL: [WikibaseDataType; 10] = [
        WikibaseDataType::String,
        WikibaseDataType::WikibaseItem,
        WikibaseDataType::WikibaseProperty,
        WikibaseDataType::Quantity,
        WikibaseDataType::Time,
        WikibaseDataType::GlobeCoordinate,
        WikibaseDataType::Url,
        WikibaseDataType::ExternalId,
        WikibaseDataType::MonolingualText,
        WikibaseDataType::CommonsMedia,
    ];

    /// The identifier used by the Wikibase API and in persisted schemas.
    pub fn as_str(&self) -> &'static str {
        match self {
            WikibaseDataType::String => "string",
            WikibaseDataType::WikibaseItem => "wikibase-item",
            WikibaseDataType::WikibaseProperty => "wikibase-property",
            WikibaseDataType::Quantity => "quantity",
            WikibaseDataType::Time => "time",
            WikibaseDataType::GlobeCoordinate => "globe-coordinate",
            WikibaseDataType::Url => "url",
            WikibaseDataType::ExternalId => "external-id",
            WikibaseDataType::MonolingualText => "monolingualtext",
            WikibaseDataType::CommonsMedia => "commonsMedia",
        }
    }

    /// Whether values of this type are entered as free text.
    pub fn is_text_based(&self) -> bool {
        matches!(
            self,
            WikibaseDataType::String
                | WikibaseDataType::ExternalId
                | WikibaseDataType::MonolingualText
                | WikibaseDataType::Url
                | WikibaseDataType::CommonsMedia
        )
    }
}

impl fmt::Display for WikibaseDataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WikibaseDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown Wikibase data type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_api_identifiers() {
        for data_type in WikibaseDataType::ALL {
            let json = serde_json::to_string(&data_type).unwrap();
            assert_eq!(json, format!("\"{}\"", data_type.as_str()));
            assert_eq!(data_type.as_str().parse::<WikibaseDataType>(), Ok(data_type));
        }
    }

    #[test]
    fn rejects_unknown_type() {
        assert!("math".parse::<WikibaseDataType>().is_err());
        assert!(serde_json::from_str::<WikibaseDataType>("\"Quantity\"").is_err());
    }
}
