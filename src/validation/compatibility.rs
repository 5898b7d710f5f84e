//! Drag-and-drop compatibility between dataset columns and schema targets.
//!
//! Checks are synchronous and stateless so they can run for every visible
//! drop target as soon as a drag starts.

use super::types::ValidationError;
use crate::columns::ColumnInfo;
use crate::schema::types::{PropertyReference, WikibaseDataType};
use serde::{Deserialize, Serialize};

pub const INCOMPATIBLE_DATA_TYPE: &str = "INCOMPATIBLE_DATA_TYPE";
pub const MISSING_LANGUAGE: &str = "MISSING_LANGUAGE";
pub const INVALID_PROPERTY_ID: &str = "INVALID_PROPERTY_ID";
pub const MISSING_PROPERTY: &str = "MISSING_PROPERTY";
pub const NULLABLE_REQUIRED: &str = "NULLABLE_REQUIRED_TARGET";

const TEXT_TYPES: &[&str] = &["VARCHAR", "TEXT", "STRING", "CHAR"];
const IDENTIFIER_TYPES: &[&str] = &["VARCHAR", "TEXT", "STRING"];
const NUMERIC_TYPES: &[&str] = &[
    "INTEGER", "INT", "BIGINT", "DECIMAL", "NUMERIC", "FLOAT", "DOUBLE", "REAL",
];
const TEMPORAL_TYPES: &[&str] = &["DATE", "DATETIME", "TIMESTAMP"];

/// Native column types accepted for values of a Wikibase data type.
pub fn acceptable_column_types(data_type: WikibaseDataType) -> &'static [&'static str] {
    match data_type {
        WikibaseDataType::String
        | WikibaseDataType::ExternalId
        | WikibaseDataType::MonolingualText => TEXT_TYPES,
        WikibaseDataType::WikibaseItem
        | WikibaseDataType::WikibaseProperty
        | WikibaseDataType::GlobeCoordinate
        | WikibaseDataType::Url
        | WikibaseDataType::CommonsMedia => IDENTIFIER_TYPES,
        WikibaseDataType::Quantity => NUMERIC_TYPES,
        WikibaseDataType::Time => TEMPORAL_TYPES,
    }
}

/// Case-insensitive membership of `column_type` in the table for `data_type`.
pub fn is_compatible(column_type: &str, data_type: WikibaseDataType) -> bool {
    acceptable_column_types(data_type)
        .iter()
        .any(|t| t.eq_ignore_ascii_case(column_type.trim()))
}

/// Every Wikibase data type a column could feed.
pub fn compatible_data_types(column: &ColumnInfo) -> Vec<WikibaseDataType> {
    WikibaseDataType::ALL
        .into_iter()
        .filter(|t| is_compatible(&column.data_type, *t))
        .collect()
}

fn is_text_column(column_type: &str) -> bool {
    TEXT_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(column_type.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropTargetType {
    Label,
    Description,
    Alias,
    Statement,
    Qualifier,
    Reference,
}

impl DropTargetType {
    pub fn is_term(&self) -> bool {
        matches!(
            self,
            DropTargetType::Label | DropTargetType::Description | DropTargetType::Alias
        )
    }

    fn plural(&self) -> &'static str {
        match self {
            DropTargetType::Label => "labels",
            DropTargetType::Description => "descriptions",
            DropTargetType::Alias => "aliases",
            DropTargetType::Statement => "statements",
            DropTargetType::Qualifier => "qualifiers",
            DropTargetType::Reference => "references",
        }
    }
}

/// A place in the schema editor that a column can be dropped onto.
///
/// `path` locates the target in the schema: `labels.<lang>`,
/// `descriptions.<lang>`, `aliases.<lang>`, `statements` (new statement),
/// `statements.<id>.value`, `statements.<id>.qualifiers` or
/// `statements.<id>.references`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    #[serde(rename = "type")]
    pub target_type: DropTargetType,
    pub path: String,
    #[serde(default)]
    pub accepted_types: Vec<WikibaseDataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
}

impl DropTarget {
    /// A term slot (label, description or alias) for one language.
    pub fn term(target_type: DropTargetType, language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            target_type,
            path: format!("{}.{}", target_type.plural(), language),
            accepted_types: vec![WikibaseDataType::String],
            language: Some(language),
            property_id: None,
            is_required: None,
        }
    }

    /// The value slot of a new statement for `property`.
    pub fn statement(property: &PropertyReference) -> Self {
        Self {
            target_type: DropTargetType::Statement,
            path: "statements".to_string(),
            accepted_types: vec![property.data_type],
            language: None,
            property_id: Some(property.id.clone()),
            is_required: None,
        }
    }

    /// A qualifier or reference slot of an existing statement.
    pub fn snak(
        target_type: DropTargetType,
        statement_id: &str,
        property: &PropertyReference,
    ) -> Self {
        Self {
            target_type,
            path: format!("statements.{}.{}", statement_id, target_type.plural()),
            accepted_types: vec![property.data_type],
            language: None,
            property_id: Some(property.id.clone()),
            is_required: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = Some(true);
        self
    }
}

/// Outcome of checking one column against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropValidation {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

/// Event emitted to the UI layer when a drop is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum DragDropEvent {
    ColumnDropped { target: DropTarget, column: ColumnInfo },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Accepted(DragDropEvent),
    Rejected(ValidationError),
}

/// Decides whether a column may be dropped onto a target.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityValidator;

impl CompatibilityValidator {
    pub fn new() -> Self {
        Self
    }

    /// Checks a drop and reports the first failing reason, if any.
    pub fn validate(&self, column: &ColumnInfo, target: &DropTarget) -> DropValidation {
        let errors: Vec<ValidationError> = self.first_error(column, target).into_iter().collect();
        let mut warnings = Vec::new();

        if errors.is_empty() && column.nullable && target.is_required == Some(true) {
            warnings.push(
                ValidationError::warning(
                    NULLABLE_REQUIRED,
                    format!(
                        "Column '{}' may contain empty values but the target is required",
                        column.name
                    ),
                )
                .at(target.path.clone())
                .suggest("Filter out rows with empty values or choose a non-nullable column"),
            );
        }

        DropValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn is_valid_drop(&self, column: &ColumnInfo, target: &DropTarget) -> bool {
        self.first_error(column, target).is_none()
    }

    /// Targets to highlight as soon as a drag of `column` starts.
    pub fn valid_targets<'a>(
        &self,
        column: &ColumnInfo,
        targets: &'a [DropTarget],
    ) -> Vec<&'a DropTarget> {
        let valid: Vec<&DropTarget> = targets
            .iter()
            .filter(|t| self.is_valid_drop(column, t))
            .collect();
        crate::log_validation_debug!(
            "Column '{}' ({}) can be dropped on {} of {} targets",
            column.name,
            column.data_type,
            valid.len(),
            targets.len()
        );
        valid
    }

    /// Validates a drop and, when legal, produces the `column-dropped` event.
    pub fn handle_drop(&self, column: &ColumnInfo, target: &DropTarget) -> DropOutcome {
        match self.first_error(column, target) {
            None => DropOutcome::Accepted(DragDropEvent::ColumnDropped {
                target: target.clone(),
                column: column.clone(),
            }),
            Some(error) => {
                crate::log_validation_info!(
                    "Rejected drop of '{}' on {}: {}",
                    column.name,
                    target.path,
                    error.message
                );
                DropOutcome::Rejected(error)
            }
        }
    }

    fn first_error(&self, column: &ColumnInfo, target: &DropTarget) -> Option<ValidationError> {
        if target.target_type.is_term() {
            if target.language.as_deref().map_or(true, str::is_empty) {
                return Some(
                    ValidationError::error(
                        MISSING_LANGUAGE,
                        format!("A language is required for {}", target.target_type.plural()),
                    )
                    .at(target.path.clone())
                    .suggest("Select a language before mapping terms"),
                );
            }
            if !is_text_column(&column.data_type) {
                return Some(
                    ValidationError::error(
                        INCOMPATIBLE_DATA_TYPE,
                        format!(
                            "Column '{}' of type {} cannot be used for {}",
                            column.name,
                            column.data_type,
                            target.target_type.plural()
                        ),
                    )
                    .at(target.path.clone())
                    .suggest(format!(
                        "Use text-based columns for {}",
                        target.target_type.plural()
                    )),
                );
            }
        }

        // Statement, qualifier and reference values cannot be built without a property
        if !target.target_type.is_term() && target.property_id.is_none() {
            return Some(
                ValidationError::error(
                    MISSING_PROPERTY,
                    format!("A property is required for {}", target.target_type.plural()),
                )
                .at(target.path.clone())
                .suggest("Select a property before mapping values"),
            );
        }

        if let Some(property_id) = &target.property_id {
            if !PropertyReference::is_valid_id(property_id) {
                return Some(
                    ValidationError::error(
                        INVALID_PROPERTY_ID,
                        format!("'{}' is not a valid property id", property_id),
                    )
                    .at(target.path.clone())
                    .for_property(property_id.clone())
                    .suggest("Property ids have the form P<number>, e.g. P31"),
                );
            }
        }

        let failing = target
            .accepted_types
            .iter()
            .find(|t| !is_compatible(&column.data_type, **t))?;

        let mut error = ValidationError::error(
            INCOMPATIBLE_DATA_TYPE,
            format!(
                "Column '{}' of type {} is not compatible with {} values",
                column.name, column.data_type, failing
            ),
        )
        .at(target.path.clone())
        .suggest(type_suggestion(*failing));
        if let Some(property_id) = &target.property_id {
            error = error.for_property(property_id.clone());
        }
        Some(error)
    }
}

fn type_suggestion(data_type: WikibaseDataType) -> String {
    match data_type {
        WikibaseDataType::Quantity => "Use numeric columns for quantity values".to_string(),
        WikibaseDataType::Time => "Use date or timestamp columns for time values".to_string(),
        other => format!("Use text-based columns for {} values", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(data_type: &str) -> ColumnInfo {
        ColumnInfo::new("col", data_type)
    }

    fn quantity_target() -> DropTarget {
        DropTarget::statement(&PropertyReference::new("P1082", WikibaseDataType::Quantity))
    }

    #[test]
    fn varchar_fits_terms_but_not_quantities() {
        let validator = CompatibilityValidator::new();
        let varchar = column("VARCHAR");
        assert!(validator.is_valid_drop(&varchar, &DropTarget::term(DropTargetType::Label, "en")));
        assert!(validator.is_valid_drop(
            &varchar,
            &DropTarget::term(DropTargetType::Description, "en")
        ));
        assert!(!validator.is_valid_drop(&varchar, &quantity_target()));
    }

    #[test]
    fn integer_fits_quantities_but_not_labels() {
        let validator = CompatibilityValidator::new();
        let integer = column("INTEGER");
        assert!(validator.is_valid_drop(&integer, &quantity_target()));

        let result = validator.validate(&integer, &DropTarget::term(DropTargetType::Label, "en"));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, INCOMPATIBLE_DATA_TYPE);
        assert_eq!(result.errors[0].path.as_deref(), Some("labels.en"));
        assert_eq!(result.errors[0].suggestions, vec!["Use text-based columns for labels"]);
    }

    #[test]
    fn column_types_compare_case_insensitively() {
        assert!(is_compatible("varchar", WikibaseDataType::String));
        assert!(is_compatible("Timestamp", WikibaseDataType::Time));
        assert!(is_compatible(" decimal ", WikibaseDataType::Quantity));
        assert!(!is_compatible("BOOLEAN", WikibaseDataType::String));
    }

    #[test]
    fn every_accepted_type_must_match() {
        let validator = CompatibilityValidator::new();
        let mut target = quantity_target();
        target.accepted_types = vec![WikibaseDataType::String, WikibaseDataType::Time];

        let result = validator.validate(&column("TEXT"), &target);
        assert!(!result.is_valid);
        assert!(result.errors[0].message.contains("time"));
        assert_eq!(
            result.errors[0].suggestions,
            vec!["Use date or timestamp columns for time values"]
        );
        assert_eq!(result.errors[0].property_id.as_deref(), Some("P1082"));
    }

    #[test]
    fn value_targets_need_a_property() {
        let validator = CompatibilityValidator::new();
        let property = PropertyReference::new("P1476", WikibaseDataType::String);
        for mut target in [
            DropTarget::statement(&property),
            DropTarget::snak(DropTargetType::Qualifier, "s1", &property),
            DropTarget::snak(DropTargetType::Reference, "s1", &property),
        ] {
            target.property_id = None;
            let result = validator.validate(&column("VARCHAR"), &target);
            assert!(!result.is_valid);
            assert_eq!(result.errors[0].code, MISSING_PROPERTY);
        }
    }

    #[test]
    fn term_targets_need_a_language() {
        let validator = CompatibilityValidator::new();
        let mut target = DropTarget::term(DropTargetType::Alias, "en");
        target.language = None;
        let result = validator.validate(&column("VARCHAR"), &target);
        assert_eq!(result.errors[0].code, MISSING_LANGUAGE);
    }

    #[test]
    fn malformed_property_id_is_rejected() {
        let validator = CompatibilityValidator::new();
        let mut target = quantity_target();
        target.property_id = Some("P0".to_string());
        let result = validator.validate(&column("INTEGER"), &target);
        assert_eq!(result.errors[0].code, INVALID_PROPERTY_ID);
    }

    #[test]
    fn nullable_column_on_required_target_warns() {
        let validator = CompatibilityValidator::new();
        let mut nullable = column("VARCHAR");
        nullable.nullable = true;
        let target = DropTarget::term(DropTargetType::Label, "en").required();

        let result = validator.validate(&nullable, &target);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, NULLABLE_REQUIRED);
    }

    #[test]
    fn valid_targets_for_drag_start() {
        let validator = CompatibilityValidator::new();
        let targets = vec![
            DropTarget::term(DropTargetType::Label, "en"),
            quantity_target(),
            DropTarget::statement(&PropertyReference::new("P585", WikibaseDataType::Time)),
        ];
        let valid = validator.valid_targets(&column("DATE"), &targets);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].accepted_types, vec![WikibaseDataType::Time]);
    }

    #[test]
    fn handle_drop_emits_event_or_error() {
        let validator = CompatibilityValidator::new();
        let target = DropTarget::term(DropTargetType::Label, "en");

        match validator.handle_drop(&column("TEXT"), &target) {
            DropOutcome::Accepted(DragDropEvent::ColumnDropped { target: t, column: c }) => {
                assert_eq!(t, target);
                assert_eq!(c.data_type, "TEXT");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(
            validator.handle_drop(&column("FLOAT"), &target),
            DropOutcome::Rejected(_)
        ));
    }

    #[test]
    fn results_are_deterministic() {
        let validator = CompatibilityValidator::new();
        let target = quantity_target();
        let first = validator.validate(&column("TEXT"), &target);
        for _ in 0..5 {
            assert_eq!(validator.validate(&column("TEXT"), &target), first);
        }
    }

    #[test]
    fn compatible_data_types_for_column() {
        let types = compatible_data_types(&column("integer"));
        assert_eq!(types, vec![WikibaseDataType::Quantity]);
        assert!(compatible_data_types(&column("TEXT")).contains(&WikibaseDataType::Url));
    }

    #[test]
    fn event_serializes_with_kebab_name() {
        let event = DragDropEvent::ColumnDropped {
            target: DropTarget::term(DropTargetType::Label, "en"),
            column: column("TEXT"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "column-dropped");
        assert_eq!(json["target"]["type"], "label");
        assert_eq!(json["target"]["acceptedTypes"][0], "string");
    }
}
