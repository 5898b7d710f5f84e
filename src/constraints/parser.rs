//! Extraction of constraint declarations from property entity records.

use super::entity::{Claim, EntityRecord, Snak};
use super::types::{
    PropertyConstraint, ALLOWED_VALUES_CONSTRAINT, FORMAT_CONSTRAINT, RANGE_CONSTRAINT,
    VALUE_TYPE_CONSTRAINT,
};
use serde_json::Value;
use std::collections::BTreeMap;

// Qualifiers carrying constraint parameters.
const FORMAT_PATTERN: &str = "P1793";
const ITEM_OF_CONSTRAINT: &str = "P2305";
const CLASS: &str = "P2308";
const MINIMUM_QUANTITY: &str = "P2313";
const MAXIMUM_QUANTITY: &str = "P2312";

/// Parses every non-deprecated claim under `constraint_property`.
pub fn parse_constraints(entity: &EntityRecord, constraint_property: &str) -> Vec<PropertyConstraint> {
    entity
        .claims_for(constraint_property)
        .iter()
        .filter(|claim| !claim.is_deprecated())
        .filter_map(parse_constraint_claim)
        .collect()
}

/// Turns one constraint claim into a constraint, or `None` when the claim
/// does not name a constraint item (e.g. `novalue` snaks).
pub fn parse_constraint_claim(claim: &Claim) -> Option<PropertyConstraint> {
    let constraint_id = claim.mainsnak.entity_id()?;
    let mut parameters = BTreeMap::new();

    match constraint_id.as_str() {
        FORMAT_CONSTRAINT => {
            if let Some(pattern) = claim
                .qualifier_snaks(FORMAT_PATTERN)
                .iter()
                .find_map(Snak::string_value)
            {
                parameters.insert("pattern".to_string(), Value::from(pattern));
            }
        }
        ALLOWED_VALUES_CONSTRAINT => {
            parameters.insert(
                "values".to_string(),
                Value::from(qualifier_ids(claim, ITEM_OF_CONSTRAINT)),
            );
        }
        VALUE_TYPE_CONSTRAINT => {
            parameters.insert("classes".to_string(), Value::from(qualifier_ids(claim, CLASS)));
        }
        RANGE_CONSTRAINT => {
            if let Some(min) = first_amount(claim, MINIMUM_QUANTITY) {
                parameters.insert("min".to_string(), Value::from(min));
            }
            if let Some(max) = first_amount(claim, MAXIMUM_QUANTITY) {
                parameters.insert("max".to_string(), Value::from(max));
            }
        }
        _ => {}
    }

    Some(PropertyConstraint::from_declaration(&constraint_id, &parameters))
}

fn qualifier_ids(claim: &Claim, property: &str) -> Vec<String> {
    claim
        .qualifier_snaks(property)
        .iter()
        .filter_map(Snak::entity_id)
        .collect()
}

fn first_amount(claim: &Claim, property: &str) -> Option<f64> {
    claim
        .qualifier_snaks(property)
        .iter()
        .find_map(Snak::quantity_amount)
}
