use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Constraint type reported for failures of the validation machinery itself.
pub const SYSTEM_ERROR: &str = "system_error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A UI-facing problem with a proposed drop, scoped to a path in the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ValidationError {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            path: None,
            property_id: None,
            value: None,
            suggestions: Vec::new(),
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn for_property(mut self, property_id: impl Into<String>) -> Self {
        self.property_id = Some(property_id.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

/// A value that breaks one of its property's constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintViolation {
    pub constraint_type: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ConstraintViolation {
    pub fn new(
        constraint_type: impl Into<String>,
        property_id: impl Into<String>,
        message: impl Into<String>,
        value: Option<Value>,
    ) -> Self {
        Self {
            constraint_type: constraint_type.into(),
            message: message.into(),
            severity: Severity::Error,
            property_id: Some(property_id.into()),
            value,
        }
    }

    /// A failure of the validation machinery rather than of the value.
    ///
    /// `property_id` is `None` when the failure is not tied to one property.
    pub fn system_error(property_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            constraint_type: SYSTEM_ERROR.to_string(),
            message: message.into(),
            severity: Severity::Error,
            property_id,
            value: None,
        }
    }
}

/// Advisory output, e.g. a constraint that could not be checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub constraint_type: String,
    pub message: String,
    pub property_id: String,
}

/// Result of any validation call. Always produced, never replaced by an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<ConstraintViolation>,
    pub warnings: Vec<ValidationWarning>,
    pub suggestions: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            violations: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Builds a result whose validity follows from the violations.
    pub fn from_parts(
        violations: Vec<ConstraintViolation>,
        warnings: Vec<ValidationWarning>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
            warnings,
            suggestions,
        }
    }

    /// A single `system_error` violation with a connectivity hint.
    pub fn system_error(property_id: Option<String>, message: impl Into<String>) -> Self {
        Self::from_parts(
            vec![ConstraintViolation::system_error(property_id, message)],
            Vec::new(),
            vec!["Check your connection to the Wikibase instance and try again".to_string()],
        )
    }

    pub fn has_system_error(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.constraint_type == SYSTEM_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_error_serializes_severity_as_type() {
        let error = ValidationError::error("INCOMPATIBLE_DATA_TYPE", "nope")
            .at("labels.en")
            .suggest("Use text-based columns for labels");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["path"], "labels.en");
        assert!(json.get("propertyId").is_none());
        assert_eq!(json["suggestions"], json!(["Use text-based columns for labels"]));
    }

    #[test]
    fn validity_follows_violations() {
        assert!(ValidationResult::from_parts(Vec::new(), Vec::new(), Vec::new()).is_valid);
        let result = ValidationResult::system_error(Some("P31".to_string()), "timeout");
        assert!(!result.is_valid);
        assert!(result.has_system_error());
        assert_eq!(result.suggestions.len(), 1);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["violations"][0]["constraintType"], "system_error");
        assert_eq!(json["violations"][0]["propertyId"], "P31");

        let top_level = ValidationResult::system_error(None, "join failed");
        let json = serde_json::to_value(&top_level).unwrap();
        assert!(json["violations"][0].get("propertyId").is_none());
    }
}
