use wikibase_schema::columns::ColumnInfo;
use wikibase_schema::schema::builder::{
    build_column_value, build_constant_value, build_item_schema, build_qualifier,
    build_reference_snak, build_statement, create_empty_schema, parse_schema, serialize_schema,
};
use wikibase_schema::schema::{
    apply_column_drop, ColumnMapping, InMemoryPersistence, PropertyReference, SchemaPersistence,
    SchemaSession, SchemaStore, SledPersistence, StatementRank, TermsMapping, WikibaseDataType,
};
use wikibase_schema::validation::{CompatibilityValidator, DropOutcome, DropTarget, DropTargetType};
use std::collections::HashSet;

fn population() -> PropertyReference {
    PropertyReference::new("P1082", WikibaseDataType::Quantity).with_label("population")
}

fn instance_of() -> PropertyReference {
    PropertyReference::new("P31", WikibaseDataType::WikibaseItem)
}

fn populated_store() -> SchemaStore {
    let mut store = SchemaStore::new();
    store.set_item_id(Some("Q64".to_string()));
    store.add_label_mapping("en", ColumnMapping::new("name", "VARCHAR"));
    store.add_description_mapping("de", ColumnMapping::new("beschreibung", "TEXT"));
    store.add_alias_mapping("en", ColumnMapping::new("alt_name", "VARCHAR"));
    store.add_alias_mapping("en", ColumnMapping::new("short_name", "VARCHAR"));

    let id = store.add_statement(
        population(),
        build_column_value(ColumnMapping::new("pop", "INTEGER"), WikibaseDataType::Quantity),
    );
    store.add_qualifier(
        &id,
        PropertyReference::new("P585", WikibaseDataType::Time),
        build_column_value(ColumnMapping::new("census_date", "DATE"), WikibaseDataType::Time),
    );
    store.add_reference(
        &id,
        vec![build_reference_snak(
            PropertyReference::new("P854", WikibaseDataType::Url),
            build_constant_value("https://example.org/census", WikibaseDataType::Url),
        )],
    );
    store.add_statement(
        instance_of(),
        build_constant_value("Q515", WikibaseDataType::WikibaseItem),
    );
    store
}

#[test]
fn test_round_trip_preserves_schema() {
    let schema = populated_store().schema();
    let parsed = parse_schema(&serialize_schema(&schema));

    assert_eq!(parsed, schema);
    assert_eq!(parsed.statements.len(), 2);
    assert_eq!(parsed.statements[0].property.id, "P1082");
    assert_eq!(parsed.terms.aliases["en"].len(), 2);
}

#[test]
fn test_malformed_json_loads_as_empty_schema() {
    assert_eq!(parse_schema("{not json"), create_empty_schema());
    assert_eq!(parse_schema(""), create_empty_schema());
}

#[test]
fn test_remove_statement_is_idempotent() {
    let mut store = populated_store();
    let id = store.statements().next().unwrap().id.clone();

    store.remove_statement(&id);
    let once = store.schema();
    store.remove_statement(&id);

    assert_eq!(store.schema(), once);
    assert_eq!(store.statement_count(), 1);
}

#[test]
fn test_statement_ids_are_unique() {
    let mut store = SchemaStore::new();
    let mut ids = HashSet::new();
    for i in 0..200 {
        let id = store.add_statement(
            instance_of(),
            build_constant_value(format!("Q{}", i + 1), WikibaseDataType::WikibaseItem),
        );
        assert!(ids.insert(id));
    }
    assert_eq!(store.statement_count(), 200);
}

#[test]
fn test_default_rank_is_normal() {
    let mut store = SchemaStore::new();
    let id = store.add_statement(
        population(),
        build_constant_value("1", WikibaseDataType::Quantity),
    );
    let statement = store.statement(&id).unwrap();

    assert_eq!(statement.rank, StatementRank::Normal);
    assert!(statement.qualifiers.is_empty());
    assert!(statement.references.is_empty());

    let built = build_statement(
        population(),
        build_constant_value("1", WikibaseDataType::Quantity),
        StatementRank::default(),
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(built.rank, StatementRank::Normal);
}

#[test]
fn test_every_mutation_marks_dirty() {
    let mut store = populated_store();
    let id = store.statements().next().unwrap().id.clone();

    let mutations: Vec<Box<dyn Fn(&mut SchemaStore)>> = vec![
        Box::new(|s: &mut SchemaStore| s.remove_label_mapping("fr")),
        Box::new(|s: &mut SchemaStore| s.remove_statement("missing")),
        Box::new(move |s: &mut SchemaStore| s.update_statement_rank(&id, StatementRank::Preferred)),
        Box::new(|s: &mut SchemaStore| s.set_item_id(None)),
    ];

    for mutate in mutations {
        store.mark_as_saved();
        assert!(!store.is_dirty());
        mutate(&mut store);
        assert!(store.is_dirty());
    }
}

#[test]
fn test_build_item_schema_keeps_statement_order() {
    let first = build_statement(
        population(),
        build_constant_value("1", WikibaseDataType::Quantity),
        StatementRank::default(),
        Vec::new(),
        Vec::new(),
    );
    let qualifier = build_qualifier(
        PropertyReference::new("P585", WikibaseDataType::Time),
        build_constant_value("2020-01-01", WikibaseDataType::Time),
    );
    let second = build_statement(
        instance_of(),
        build_constant_value("Q515", WikibaseDataType::WikibaseItem),
        StatementRank::Preferred,
        vec![qualifier],
        Vec::new(),
    );

    let schema = build_item_schema(TermsMapping::default(), vec![first.clone(), second.clone()]);
    let store = SchemaStore::from_schema(schema);
    let ids: Vec<&str> = store.statements().map(|s| s.id.as_str()).collect();

    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
    assert!(!store.is_dirty());
}

#[test]
fn test_drag_and_drop_flow() {
    let validator = CompatibilityValidator::new();
    let mut store = SchemaStore::new();
    let name = ColumnInfo::new("name", "varchar");
    let pop = ColumnInfo::new("pop", "BIGINT");

    let label = DropTarget::term(DropTargetType::Label, "en");
    let statement = DropTarget::statement(&population());

    // A numeric column may not become a label
    assert!(matches!(validator.handle_drop(&pop, &label), DropOutcome::Rejected(_)));

    let DropOutcome::Accepted(event) = validator.handle_drop(&name, &label) else {
        panic!("label drop should be accepted");
    };
    assert_eq!(apply_column_drop(&mut store, &event), None);
    assert_eq!(store.terms().labels["en"].column_name, "name");

    let DropOutcome::Accepted(event) = validator.handle_drop(&pop, &statement) else {
        panic!("statement drop should be accepted");
    };
    let id = apply_column_drop(&mut store, &event).unwrap();
    let created = store.statement(&id).unwrap();
    assert_eq!(created.property.id, "P1082");
    assert_eq!(created.value.column().unwrap().column_name, "pop");
}

#[test]
fn test_session_save_and_reopen_in_memory() {
    let persistence = InMemoryPersistence::new();
    let mut session = SchemaSession::open(persistence, "city").unwrap();
    assert!(session.store().schema().statements.is_empty());

    session.store_mut().add_label_mapping("en", ColumnMapping::new("name", "VARCHAR"));
    assert!(session.store().is_dirty());
    session.save().unwrap();
    assert!(!session.store().is_dirty());
    assert!(session.store().last_saved().is_some());

    let persistence = session.delete().unwrap();
    assert_eq!(persistence.list().unwrap(), Vec::<String>::new());
}

#[test]
fn test_sled_persistence_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let expected = populated_store().schema();

    {
        let persistence = SledPersistence::open(dir.path()).unwrap();
        let mut session = SchemaSession::open(persistence, "city").unwrap();
        session.store_mut().load(expected.clone());
        session.save().unwrap();
    }

    let persistence = SledPersistence::open(dir.path()).unwrap();
    assert_eq!(persistence.list().unwrap(), vec!["city".to_string()]);
    let session = SchemaSession::open(persistence, "city").unwrap();
    assert_eq!(session.store().schema(), expected);
    assert!(!session.store().is_dirty());
}
