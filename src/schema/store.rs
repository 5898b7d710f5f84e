//! The in-memory schema model edited by the drag-and-drop editor.

use super::builder::{self, create_empty_schema};
use super::types::{
    ColumnMapping, ItemSchemaMapping, PropertyReference, QualifierMapping, ReferenceMapping,
    ReferenceSnak, StatementMapping, StatementRank, TermsMapping, ValueMapping,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Single source of truth for one [`ItemSchemaMapping`] while it is being edited.
///
/// Every mutating call marks the store dirty, including calls that turn out
/// to be no-ops because the targeted id or language does not exist. Only
/// [`SchemaStore::mark_as_saved`] and [`SchemaStore::load`] leave it clean.
///
/// Statements are kept in a single insertion-ordered map keyed by id; the
/// ordered list in [`SchemaStore::schema`] is derived from it on demand.
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    item_id: Option<String>,
    terms: TermsMapping,
    statements: IndexMap<String, StatementMapping>,
    /// Every statement id this store has handed out or loaded; never shrinks.
    issued_ids: HashSet<String>,
    dirty: bool,
    last_saved: Option<DateTime<Utc>>,
}

impl SchemaStore {
    /// Creates a store holding an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clean store holding `schema`.
    pub fn from_schema(schema: ItemSchemaMapping) -> Self {
        let mut store = Self::new();
        store.load(schema);
        store
    }

    /// Replaces the store's content with a freshly loaded schema and leaves it clean.
    ///
    /// Statements whose id repeats an earlier one are given a new id.
    pub fn load(&mut self, schema: ItemSchemaMapping) {
        let ItemSchemaMapping {
            id,
            terms,
            statements,
        } = schema;

        self.item_id = id;
        self.terms = terms;
        self.statements = IndexMap::with_capacity(statements.len());
        self.issued_ids.clear();

        for mut statement in statements {
            if self.issued_ids.contains(&statement.id) {
                let fresh = self.next_statement_id();
                crate::log_schema_warn!(
                    "Duplicate statement id '{}' in loaded schema, reassigned to '{}'",
                    statement.id,
                    fresh
                );
                statement.id = fresh;
            }
            self.issued_ids.insert(statement.id.clone());
            self.statements.insert(statement.id.clone(), statement);
        }

        self.dirty = false;
        crate::log_schema_debug!(
            "Loaded schema with {} statements",
            self.statements.len()
        );
    }

    /// Ordered snapshot of the current schema.
    pub fn schema(&self) -> ItemSchemaMapping {
        ItemSchemaMapping {
            id: self.item_id.clone(),
            terms: self.terms.clone(),
            statements: self.statements.values().cloned().collect(),
        }
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn terms(&self) -> &TermsMapping {
        &self.terms
    }

    pub fn statement(&self, id: &str) -> Option<&StatementMapping> {
        self.statements.get(id)
    }

    /// Statements in display order.
    pub fn statements(&self) -> impl Iterator<Item = &StatementMapping> {
        self.statements.values()
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn set_item_id(&mut self, item_id: Option<String>) {
        self.item_id = item_id;
        self.touch();
    }

    pub fn add_label_mapping(&mut self, language: impl Into<String>, mapping: ColumnMapping) {
        self.terms.labels.insert(language.into(), mapping);
        self.touch();
    }

    pub fn remove_label_mapping(&mut self, language: &str) {
        self.terms.labels.remove(language);
        self.touch();
    }

    pub fn add_description_mapping(&mut self, language: impl Into<String>, mapping: ColumnMapping) {
        self.terms.descriptions.insert(language.into(), mapping);
        self.touch();
    }

    pub fn remove_description_mapping(&mut self, language: &str) {
        self.terms.descriptions.remove(language);
        self.touch();
    }

    /// Appends an alias mapping; the same column may be added more than once.
    pub fn add_alias_mapping(&mut self, language: impl Into<String>, mapping: ColumnMapping) {
        self.terms
            .aliases
            .entry(language.into())
            .or_default()
            .push(mapping);
        self.touch();
    }

    /// Removes one alias mapping equal to `mapping`: the first occurrence.
    ///
    /// Aliases may repeat, so removing a duplicated mapping once leaves the
    /// other copies in place. The language entry is dropped once empty.
    pub fn remove_alias_mapping(&mut self, language: &str, mapping: &ColumnMapping) {
        if let Some(aliases) = self.terms.aliases.get_mut(language) {
            if let Some(pos) = aliases.iter().position(|m| m == mapping) {
                aliases.remove(pos);
            }
            if aliases.is_empty() {
                self.terms.aliases.remove(language);
            }
        }
        self.touch();
    }

    /// Adds a statement with normal rank and no qualifiers or references.
    pub fn add_statement(&mut self, property: PropertyReference, value: ValueMapping) -> String {
        self.add_statement_with(
            property,
            value,
            StatementRank::default(),
            Vec::new(),
            Vec::new(),
        )
    }

    /// Adds a statement and returns its generated id.
    pub fn add_statement_with(
        &mut self,
        property: PropertyReference,
        value: ValueMapping,
        rank: StatementRank,
        qualifiers: Vec<QualifierMapping>,
        references: Vec<ReferenceMapping>,
    ) -> String {
        let mut statement =
            builder::build_statement(property, value, rank, qualifiers, references);
        if self.issued_ids.contains(&statement.id) {
            statement.id = self.next_statement_id();
        }
        let id = statement.id.clone();

        crate::log_schema_debug!(
            "Adding statement {} for property {}",
            id,
            statement.property.id
        );
        self.issued_ids.insert(id.clone());
        self.statements.insert(id.clone(), statement);
        self.touch();
        id
    }

    pub fn remove_statement(&mut self, id: &str) {
        self.statements.shift_remove(id);
        self.touch();
    }

    pub fn update_statement_rank(&mut self, id: &str, rank: StatementRank) {
        if let Some(statement) = self.statements.get_mut(id) {
            statement.rank = rank;
        }
        self.touch();
    }

    pub fn update_statement_value(&mut self, id: &str, value: ValueMapping) {
        if let Some(statement) = self.statements.get_mut(id) {
            statement.value = value;
        }
        self.touch();
    }

    pub fn update_statement_property(&mut self, id: &str, property: PropertyReference) {
        if let Some(statement) = self.statements.get_mut(id) {
            statement.property = property;
        }
        self.touch();
    }

    /// Moves a statement to `new_index`, clamped to the last position.
    pub fn move_statement(&mut self, id: &str, new_index: usize) {
        if let Some(from) = self.statements.get_index_of(id) {
            let to = new_index.min(self.statements.len() - 1);
            self.statements.move_index(from, to);
        }
        self.touch();
    }

    /// Adds a qualifier to a statement. Returns `None` if the statement does not exist.
    pub fn add_qualifier(
        &mut self,
        statement_id: &str,
        property: PropertyReference,
        value: ValueMapping,
    ) -> Option<String> {
        let added = self.statements.get_mut(statement_id).map(|statement| {
            let qualifier = builder::build_qualifier(property, value);
            let id = qualifier.id.clone();
            statement.qualifiers.push(qualifier);
            id
        });
        self.touch();
        added
    }

    pub fn remove_qualifier(&mut self, statement_id: &str, qualifier_id: &str) {
        if let Some(statement) = self.statements.get_mut(statement_id) {
            statement.qualifiers.retain(|q| q.id != qualifier_id);
        }
        self.touch();
    }

    /// Adds a reference to a statement. Returns `None` if the statement does not exist.
    pub fn add_reference(&mut self, statement_id: &str, snaks: Vec<ReferenceSnak>) -> Option<String> {
        let added = self.statements.get_mut(statement_id).map(|statement| {
            let reference = builder::build_reference(snaks);
            let id = reference.id.clone();
            statement.references.push(reference);
            id
        });
        self.touch();
        added
    }

    pub fn remove_reference(&mut self, statement_id: &str, reference_id: &str) {
        if let Some(statement) = self.statements.get_mut(statement_id) {
            statement.references.retain(|r| r.id != reference_id);
        }
        self.touch();
    }

    /// Records a successful write to the persistence gateway.
    pub fn mark_as_saved(&mut self) {
        self.dirty = false;
        self.last_saved = Some(Utc::now());
    }

    /// Restores the empty-schema defaults.
    pub fn reset(&mut self) {
        let ItemSchemaMapping {
            id,
            terms,
            statements,
        } = create_empty_schema();
        self.item_id = id;
        self.terms = terms;
        self.statements = statements
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        self.dirty = false;
        self.last_saved = None;
        crate::log_schema_info!("Schema reset to empty defaults");
    }

    fn touch(&mut self) {
        self.dirty = true;
    }

    fn next_statement_id(&self) -> String {
        loop {
            let id = builder::generate_id();
            if !self.issued_ids.contains(&id) {
                return id;
            }
        }
    }
}
