//! Normalized constraint declarations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// Constraint type items, as used on Wikidata.
pub const FORMAT_CONSTRAINT: &str = "Q21502404";
pub const ALLOWED_VALUES_CONSTRAINT: &str = "Q21510859";
pub const VALUE_TYPE_CONSTRAINT: &str = "Q21510865";
pub const RANGE_CONSTRAINT: &str = "Q21510860";
pub const SINGLE_VALUE_CONSTRAINT: &str = "Q19474404";

// Classes whose instances are literals rather than items.
const NUMERIC_CLASSES: &[&str] = &["Q11563", "Q309314"];
const TEMPORAL_CLASSES: &[&str] = &["Q186408", "Q205892"];

/// Coarse native type a value-type constraint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeValueType {
    EntityId,
    Number,
    Time,
}

impl NativeValueType {
    /// Derives the expected type from the constraint's target classes.
    pub fn for_classes(classes: &[String]) -> Self {
        if classes.iter().any(|c| NUMERIC_CLASSES.contains(&c.as_str())) {
            NativeValueType::Number
        } else if classes.iter().any(|c| TEMPORAL_CLASSES.contains(&c.as_str())) {
            NativeValueType::Time
        } else {
            NativeValueType::EntityId
        }
    }
}

impl fmt::Display for NativeValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            NativeValueType::EntityId => "entity id",
            NativeValueType::Number => "numeric",
            NativeValueType::Time => "date/time",
        })
    }
}

/// The constraint kinds this crate can evaluate, plus a catch-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintKind {
    Format { pattern: String },
    AllowedValues { values: Vec<String> },
    ValueType { classes: Vec<String>, expected: NativeValueType },
    Range { min: Option<f64>, max: Option<f64> },
    SingleValue,
    Unsupported { constraint_id: String },
}

impl ConstraintKind {
    /// Identifier reported as `constraintType` on violations and warnings.
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintKind::Format { .. } => "format_constraint",
            ConstraintKind::AllowedValues { .. } => "allowed_values_constraint",
            ConstraintKind::ValueType { .. } => "value_type_constraint",
            ConstraintKind::Range { .. } => "range_constraint",
            ConstraintKind::SingleValue => "single_value_constraint",
            ConstraintKind::Unsupported { .. } => "unsupported_constraint",
        }
    }

    pub fn name(&self) -> String {
        match self {
            ConstraintKind::Format { .. } => "format constraint".to_string(),
            ConstraintKind::AllowedValues { .. } => "allowed values constraint".to_string(),
            ConstraintKind::ValueType { .. } => "value type constraint".to_string(),
            ConstraintKind::Range { .. } => "range constraint".to_string(),
            ConstraintKind::SingleValue => "single value constraint".to_string(),
            ConstraintKind::Unsupported { constraint_id } => constraint_id.clone(),
        }
    }

    fn description(&self) -> String {
        match self {
            ConstraintKind::Format { pattern } => {
                format!("Values must match the pattern {}", pattern)
            }
            ConstraintKind::AllowedValues { values } => {
                format!("Values must be one of: {}", values.join(", "))
            }
            ConstraintKind::ValueType { classes, .. } => {
                format!("Values must be instances of: {}", classes.join(", "))
            }
            ConstraintKind::Range { min, max } => format!(
                "Values must lie between {} and {}",
                bound_to_string(*min),
                bound_to_string(*max)
            ),
            ConstraintKind::SingleValue => "Only one value is allowed".to_string(),
            ConstraintKind::Unsupported { constraint_id } => {
                format!("Constraint {} is not checked", constraint_id)
            }
        }
    }

    fn violation_message(&self) -> String {
        match self {
            ConstraintKind::Format { .. } => "Value does not match the required format",
            ConstraintKind::AllowedValues { .. } => "Value is not one of the allowed values",
            ConstraintKind::ValueType { .. } => "Value has the wrong type",
            ConstraintKind::Range { .. } => "Value is out of range",
            ConstraintKind::SingleValue => "Property should have a single value",
            ConstraintKind::Unsupported { .. } => "Constraint type is not supported",
        }
        .to_string()
    }
}

pub(crate) fn bound_to_string(bound: Option<f64>) -> String {
    bound.map_or_else(|| "unbounded".to_string(), |b| b.to_string())
}

/// A rule declared on a property, limiting the values of its statements.
///
/// `parameters` always has the canonical shape produced by
/// [`PropertyConstraint::from_declaration`]: id lists are flat string arrays,
/// bounds are numbers, patterns are strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyConstraint {
    #[serde(rename = "type")]
    pub constraint_type: String,
    pub parameters: BTreeMap<String, Value>,
    pub description: String,
    pub violation_message: String,
    pub kind: ConstraintKind,
}

impl PropertyConstraint {
    pub fn new(kind: ConstraintKind) -> Self {
        let parameters = canonical_parameters(&kind);
        Self {
            constraint_type: kind.name(),
            parameters,
            description: kind.description(),
            violation_message: kind.violation_message(),
            kind,
        }
    }

    /// Builds a constraint from a loosely shaped declaration.
    ///
    /// `constraint_type` may be the constraint item id (`Q21502404`), its
    /// name (`format constraint`) or its code (`format_constraint`). Id lists
    /// may arrive as raw arrays, wrapped as `{"value": [...]}`, or as arrays of
    /// `{"id": ...}` objects; they are flattened here once.
    pub fn from_declaration(constraint_type: &str, parameters: &BTreeMap<String, Value>) -> Self {
        let kind = match constraint_type {
            FORMAT_CONSTRAINT | "format constraint" | "format_constraint" => {
                match parameters.get("pattern").and_then(normalize_string) {
                    Some(pattern) => ConstraintKind::Format { pattern },
                    None => ConstraintKind::Unsupported {
                        constraint_id: constraint_type.to_string(),
                    },
                }
            }
            ALLOWED_VALUES_CONSTRAINT | "allowed values constraint" | "allowed_values_constraint" => {
                ConstraintKind::AllowedValues {
                    values: parameters.get("values").map(normalize_id_list).unwrap_or_default(),
                }
            }
            VALUE_TYPE_CONSTRAINT | "value type constraint" | "value_type_constraint" => {
                let classes: Vec<String> =
                    parameters.get("classes").map(normalize_id_list).unwrap_or_default();
                let expected = NativeValueType::for_classes(&classes);
                ConstraintKind::ValueType { classes, expected }
            }
            RANGE_CONSTRAINT | "range constraint" | "range_constraint" => ConstraintKind::Range {
                min: parameters.get("min").and_then(normalize_number),
                max: parameters.get("max").and_then(normalize_number),
            },
            SINGLE_VALUE_CONSTRAINT | "single value constraint" | "single_value_constraint" => {
                ConstraintKind::SingleValue
            }
            other => ConstraintKind::Unsupported {
                constraint_id: other.to_string(),
            },
        };
        Self::new(kind)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self.kind, ConstraintKind::Unsupported { .. })
    }
}

fn canonical_parameters(kind: &ConstraintKind) -> BTreeMap<String, Value> {
    let mut parameters = BTreeMap::new();
    match kind {
        ConstraintKind::Format { pattern } => {
            parameters.insert("pattern".to_string(), Value::from(pattern.clone()));
        }
        ConstraintKind::AllowedValues { values } => {
            parameters.insert("values".to_string(), Value::from(values.clone()));
        }
        ConstraintKind::ValueType { classes, .. } => {
            parameters.insert("classes".to_string(), Value::from(classes.clone()));
        }
        ConstraintKind::Range { min, max } => {
            if let Some(min) = min {
                parameters.insert("min".to_string(), Value::from(*min));
            }
            if let Some(max) = max {
                parameters.insert("max".to_string(), Value::from(*max));
            }
        }
        ConstraintKind::SingleValue | ConstraintKind::Unsupported { .. } => {}
    }
    parameters
}

fn unwrap_value(value: &Value) -> &Value {
    match value {
        Value::Object(map) if map.contains_key("value") && !map.contains_key("id") => &map["value"],
        other => other,
    }
}

/// Flattens the accepted id-list shapes into plain ids.
pub fn normalize_id_list(value: &Value) -> Vec<String> {
    match unwrap_value(value) {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match unwrap_value(item) {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        Value::Object(map) => map
            .get("id")
            .and_then(Value::as_str)
            .map(|id| vec![id.to_string()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn normalize_string(value: &Value) -> Option<String> {
    unwrap_value(value).as_str().map(str::to_string)
}

fn normalize_number(value: &Value) -> Option<f64> {
    match unwrap_value(value) {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim_start_matches('+').parse().ok(),
        Value::Object(map) => map.get("amount").and_then(normalize_number),
        _ => None,
    }
}
