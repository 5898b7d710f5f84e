//! Test doubles and fixtures for the constraint service.

use crate::constraints::types::{
    ALLOWED_VALUES_CONSTRAINT, FORMAT_CONSTRAINT, RANGE_CONSTRAINT, SINGLE_VALUE_CONSTRAINT,
};
use crate::constraints::{ConstraintError, ConstraintResult, EntityRecord, KnowledgeBaseClient};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MockState {
    entities: HashMap<(String, String), EntityRecord>,
    failures: HashMap<String, String>,
}

/// In-memory knowledge base that counts lookups.
///
/// Clones share state, so a test can keep a handle after giving one to the
/// service.
#[derive(Clone, Default)]
pub struct MockKnowledgeBaseClient {
    state: Arc<Mutex<MockState>>,
    fetches: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl MockKnowledgeBaseClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup sleeps for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_entity(self, instance_id: &str, entity: EntityRecord) -> Self {
        self.insert_entity(instance_id, entity);
        self
    }

    pub fn insert_entity(&self, instance_id: &str, entity: EntityRecord) {
        let mut state = self.state.lock().unwrap();
        state
            .entities
            .insert((instance_id.to_string(), entity.id.clone()), entity);
    }

    /// Lookups of `entity_id` fail with an API error carrying `message`.
    pub fn fail_with(&self, entity_id: &str, message: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .failures
            .insert(entity_id.to_string(), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Highest number of lookups that were in progress at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lookup(&self, instance_id: &str, entity_id: &str) -> ConstraintResult<EntityRecord> {
        let state = self.state.lock().unwrap();
        if let Some(message) = state.failures.get(entity_id) {
            return Err(ConstraintError::api(message.clone()));
        }
        state
            .entities
            .get(&(instance_id.to_string(), entity_id.to_string()))
            .cloned()
            .ok_or_else(|| ConstraintError::EntityNotFound(entity_id.to_string()))
    }
}

#[async_trait]
impl KnowledgeBaseClient for MockKnowledgeBaseClient {
    async fn get_entity(&self, instance_id: &str, entity_id: &str) -> ConstraintResult<EntityRecord> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let result = self.lookup(instance_id, entity_id);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn item_snak(property: &str, id: &str) -> Value {
    json!({
        "snaktype": "value",
        "property": property,
        "datavalue": {
            "type": "wikibase-entityid",
            "value": { "entity-type": "item", "id": id }
        }
    })
}

fn quantity_snak(property: &str, amount: f64) -> Value {
    json!({
        "snaktype": "value",
        "property": property,
        "datavalue": {
            "type": "quantity",
            "value": { "amount": format!("{:+}", amount), "unit": "1" }
        }
    })
}

/// A property entity whose `P2302` statements are `constraint_claims`.
pub fn property_entity(property_id: &str, datatype: &str, constraint_claims: Vec<Value>) -> EntityRecord {
    serde_json::from_value(json!({
        "id": property_id,
        "datatype": datatype,
        "labels": { "en": { "language": "en", "value": format!("{} label", property_id) } },
        "claims": { "P2302": constraint_claims }
    }))
    .unwrap()
}

pub fn format_constraint_claim(pattern: &str) -> Value {
    json!({
        "mainsnak": item_snak("P2302", FORMAT_CONSTRAINT),
        "qualifiers": { "P1793": [{
            "snaktype": "value",
            "property": "P1793",
            "datavalue": { "type": "string", "value": pattern }
        }]}
    })
}

pub fn allowed_values_claim(items: &[&str]) -> Value {
    let snaks: Vec<Value> = items.iter().map(|id| item_snak("P2305", id)).collect();
    json!({
        "mainsnak": item_snak("P2302", ALLOWED_VALUES_CONSTRAINT),
        "qualifiers": { "P2305": snaks }
    })
}

pub fn range_claim(min: f64, max: f64) -> Value {
    json!({
        "mainsnak": item_snak("P2302", RANGE_CONSTRAINT),
        "qualifiers": {
            "P2313": [quantity_snak("P2313", min)],
            "P2312": [quantity_snak("P2312", max)]
        }
    })
}

pub fn single_value_claim() -> Value {
    json!({ "mainsnak": item_snak("P2302", SINGLE_VALUE_CONSTRAINT) })
}

/// A claim for a constraint type the evaluators do not know.
pub fn unsupported_claim(constraint_id: &str) -> Value {
    json!({ "mainsnak": item_snak("P2302", constraint_id) })
}

pub fn format_constraint_entity(property_id: &str, pattern: &str) -> EntityRecord {
    property_entity(property_id, "external-id", vec![format_constraint_claim(pattern)])
}
