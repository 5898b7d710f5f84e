use wikibase_schema::columns::{ColumnInfo, ColumnRegistry, StaticColumnRegistry};
use wikibase_schema::schema::{PropertyReference, WikibaseDataType};
use wikibase_schema::validation::compatibility::{is_compatible, INCOMPATIBLE_DATA_TYPE};
use wikibase_schema::validation::{CompatibilityValidator, DropTarget, DropTargetType};

fn visible_targets() -> Vec<DropTarget> {
    let population = PropertyReference::new("P1082", WikibaseDataType::Quantity);
    let inception = PropertyReference::new("P571", WikibaseDataType::Time);
    let website = PropertyReference::new("P856", WikibaseDataType::Url);
    vec![
        DropTarget::term(DropTargetType::Label, "en"),
        DropTarget::term(DropTargetType::Alias, "de"),
        DropTarget::statement(&population),
        DropTarget::statement(&inception),
        DropTarget::snak(DropTargetType::Reference, "abc", &website),
    ]
}

#[test]
fn test_drag_start_highlights_matching_targets() {
    let registry = StaticColumnRegistry::from_json(
        r#"[
            {"name": "city", "dataType": "VARCHAR", "sampleValues": ["Berlin"], "nullable": false},
            {"name": "population", "dataType": "integer", "sampleValues": ["3645000"], "nullable": true},
            {"name": "founded", "dataType": "DATE", "sampleValues": ["1237-01-01"], "nullable": false}
        ]"#,
    )
    .unwrap();
    let validator = CompatibilityValidator::new();
    let targets = visible_targets();

    let paths = |name: &str| -> Vec<String> {
        let column = registry.column(name).unwrap();
        validator
            .valid_targets(&column, &targets)
            .into_iter()
            .map(|t| t.path.clone())
            .collect()
    };

    assert_eq!(
        paths("city"),
        vec!["labels.en", "aliases.de", "statements.abc.references"]
    );
    assert_eq!(paths("population"), vec!["statements"]);
    assert_eq!(paths("founded"), vec!["statements"]);
}

#[test]
fn test_validation_is_deterministic() {
    let validator = CompatibilityValidator::new();
    let column = ColumnInfo::new("population", "INTEGER");
    for target in visible_targets() {
        let first = validator.validate(&column, &target);
        let second = validator.validate(&column, &target);
        assert_eq!(first, second);
    }
}

#[test]
fn test_rejection_agrees_with_compatibility_table() {
    let validator = CompatibilityValidator::new();
    let column_types = ["VARCHAR", "text", "CHAR", "INTEGER", "float", "DATE", "TIMESTAMP", "BLOB"];

    for column_type in column_types {
        let column = ColumnInfo::new("c", column_type);
        for data_type in WikibaseDataType::ALL {
            let property = PropertyReference::new("P1", data_type);
            let result = validator.validate(&column, &DropTarget::statement(&property));

            assert_eq!(result.is_valid, is_compatible(column_type, data_type));
            if !result.is_valid {
                assert_eq!(result.errors.len(), 1);
                assert_eq!(result.errors[0].code, INCOMPATIBLE_DATA_TYPE);
                assert!(!result.errors[0].suggestions.is_empty());
            }
        }
    }
}

#[test]
fn test_label_rejection_suggests_text_columns() {
    let validator = CompatibilityValidator::new();
    let result = validator.validate(
        &ColumnInfo::new("population", "INTEGER"),
        &DropTarget::term(DropTargetType::Label, "en"),
    );

    assert!(!result.is_valid);
    assert_eq!(result.errors[0].path.as_deref(), Some("labels.en"));
    assert_eq!(result.errors[0].suggestions, vec!["Use text-based columns for labels"]);
}
