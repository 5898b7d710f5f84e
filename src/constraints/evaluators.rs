//! Rule evaluation for parsed constraints. Pure; no I/O.

use super::types::{bound_to_string, ConstraintKind, NativeValueType, PropertyConstraint};
use crate::validation::{ConstraintViolation, ValidationResult, ValidationWarning};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ENTITY_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[QPL][1-9][0-9]*$").unwrap());

#[derive(Default)]
struct Outcome {
    violations: Vec<ConstraintViolation>,
    warnings: Vec<ValidationWarning>,
    suggestions: IndexSet<String>,
}

/// Evaluates `values` for `property_id` against every constraint.
pub fn evaluate_constraints(
    property_id: &str,
    constraints: &[PropertyConstraint],
    values: &[Value],
) -> ValidationResult {
    let mut outcome = Outcome::default();
    for constraint in constraints {
        evaluate(property_id, constraint, values, &mut outcome);
    }
    ValidationResult::from_parts(
        outcome.violations,
        outcome.warnings,
        outcome.suggestions.into_iter().collect(),
    )
}

fn evaluate(property_id: &str, constraint: &PropertyConstraint, values: &[Value], out: &mut Outcome) {
    let code = constraint.kind.code();
    match &constraint.kind {
        ConstraintKind::Format { pattern } => {
            let regex = match Regex::new(&format!("^(?:{})$", pattern)) {
                Ok(regex) => regex,
                Err(e) => {
                    crate::log_constraints_warn!(
                        "Format pattern for {} does not compile: {}",
                        property_id,
                        e
                    );
                    out.warnings.push(ValidationWarning {
                        constraint_type: code.to_string(),
                        message: format!("Format pattern '{}' could not be evaluated", pattern),
                        property_id: property_id.to_string(),
                    });
                    return;
                }
            };
            for value in values {
                let text = coerce_string(value);
                if !regex.is_match(&text) {
                    out.violations.push(ConstraintViolation::new(
                        code,
                        property_id,
                        format!("Value '{}' does not match the required format {}", text, pattern),
                        Some(value.clone()),
                    ));
                    out.suggestions
                        .insert(format!("Ensure values for {} match the pattern {}", property_id, pattern));
                }
            }
        }
        ConstraintKind::AllowedValues { values: allowed } => {
            for value in values {
                let matches = entity_id(value).map_or(false, |id| allowed.contains(&id))
                    || allowed.contains(&coerce_string(value));
                if !matches {
                    out.violations.push(ConstraintViolation::new(
                        code,
                        property_id,
                        format!("Value '{}' is not one of the allowed values", coerce_string(value)),
                        Some(value.clone()),
                    ));
                    out.suggestions
                        .insert(format!("Use one of the allowed values: {}", allowed.join(", ")));
                }
            }
        }
        ConstraintKind::ValueType { expected, .. } => {
            for value in values {
                if !has_native_type(value, *expected) {
                    out.violations.push(ConstraintViolation::new(
                        code,
                        property_id,
                        format!("Value '{}' is not a {} value", coerce_string(value), expected),
                        Some(value.clone()),
                    ));
                    out.suggestions
                        .insert(format!("Use {} values for {}", expected, property_id));
                }
            }
        }
        ConstraintKind::Range { min, max } => {
            let range_hint = format!(
                "Use values between {} and {} for {}",
                bound_to_string(*min),
                bound_to_string(*max),
                property_id
            );
            for value in values {
                let message = match as_number(value) {
                    None => format!("Value '{}' is not numeric", coerce_string(value)),
                    Some(n) if min.map_or(false, |m| n < m) => {
                        format!("Value {} is below the minimum {}", n, bound_to_string(*min))
                    }
                    Some(n) if max.map_or(false, |m| n > m) => {
                        format!("Value {} is above the maximum {}", n, bound_to_string(*max))
                    }
                    Some(_) => continue,
                };
                out.violations.push(ConstraintViolation::new(
                    code,
                    property_id,
                    message,
                    Some(value.clone()),
                ));
                out.suggestions.insert(range_hint.clone());
            }
        }
        ConstraintKind::SingleValue => {
            if values.len() > 1 {
                out.violations.push(ConstraintViolation::new(
                    code,
                    property_id,
                    format!("{} should have a single value, found {}", property_id, values.len()),
                    Some(Value::Array(values.to_vec())),
                ));
                out.suggestions
                    .insert(format!("Map only one value to {}", property_id));
            }
        }
        ConstraintKind::Unsupported { constraint_id } => {
            crate::log_constraints_debug!(
                "Constraint {} on {} is not supported",
                constraint_id,
                property_id
            );
            out.warnings.push(ValidationWarning {
                constraint_type: constraint.constraint_type.clone(),
                message: format!("Constraint type {} is not supported and was not checked", constraint_id),
                property_id: property_id.to_string(),
            });
        }
    }
}

/// String form of a candidate value: strings verbatim, ids for entity
/// objects, JSON text otherwise.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Object(_) => entity_id(value).unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

fn entity_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if ENTITY_ID.is_match(s) => Some(s.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('+').parse().ok(),
        Value::Object(map) => map.get("amount").and_then(as_number),
        _ => None,
    }
}

fn is_time(value: &Value) -> bool {
    match value {
        Value::String(s) => {
            let s = s.trim().trim_start_matches('+');
            DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
                || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        }
        Value::Object(map) => map.get("time").map_or(false, is_time),
        _ => false,
    }
}

fn has_native_type(value: &Value, expected: NativeValueType) -> bool {
    match expected {
        NativeValueType::EntityId => entity_id(value).is_some(),
        NativeValueType::Number => as_number(value).is_some(),
        NativeValueType::Time => is_time(value),
    }
}
