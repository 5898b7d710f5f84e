//! Applies accepted drops to the schema store.

use super::builder::{build_column_value, build_reference_snak};
use super::store::SchemaStore;
use super::types::{PropertyReference, WikibaseDataType};
use crate::validation::compatibility::{DragDropEvent, DropTarget, DropTargetType};

/// Applies a `column-dropped` event to the store.
///
/// Returns the id of the statement, qualifier or reference created, if the
/// drop created one. Events whose target no longer resolves (for example a
/// statement removed while the drag was in flight) leave the schema unchanged.
pub fn apply_column_drop(store: &mut SchemaStore, event: &DragDropEvent) -> Option<String> {
    let DragDropEvent::ColumnDropped { target, column } = event;
    let mapping = column.to_mapping();

    match target.target_type {
        DropTargetType::Label => {
            store.add_label_mapping(target.language.clone()?, mapping);
            None
        }
        DropTargetType::Description => {
            store.add_description_mapping(target.language.clone()?, mapping);
            None
        }
        DropTargetType::Alias => {
            store.add_alias_mapping(target.language.clone()?, mapping);
            None
        }
        DropTargetType::Statement => match statement_id(&target.path) {
            Some(id) => {
                // The existing statement's property decides the value type
                let data_type = store.statement(id)?.property.data_type;
                store.update_statement_value(id, build_column_value(mapping, data_type));
                Some(id.to_string())
            }
            None => {
                let property = target_property(target)?;
                let value = build_column_value(mapping, property.data_type);
                Some(store.add_statement(property, value))
            }
        },
        DropTargetType::Qualifier => {
            let property = target_property(target)?;
            let value = build_column_value(mapping, property.data_type);
            store.add_qualifier(statement_id(&target.path)?, property, value)
        }
        DropTargetType::Reference => {
            let property = target_property(target)?;
            let value = build_column_value(mapping, property.data_type);
            let snak = build_reference_snak(property, value);
            store.add_reference(statement_id(&target.path)?, vec![snak])
        }
    }
}

fn target_property(target: &DropTarget) -> Option<PropertyReference> {
    let data_type = target
        .accepted_types
        .first()
        .copied()
        .unwrap_or(WikibaseDataType::String);
    Some(PropertyReference::new(target.property_id.clone()?, data_type))
}

/// Extracts `<id>` from `statements.<id>` or `statements.<id>.<slot>`.
fn statement_id(path: &str) -> Option<&str> {
    let mut parts = path.splitn(3, '.');
    match (parts.next(), parts.next()) {
        (Some("statements"), Some(id)) if !id.is_empty() => Some(id),
        _ => None,
    }
}
