//! Constraint validation service: fetch, cache and evaluate.

use super::cache::{cache_key, CachedConstraints, ConstraintCache};
use super::client::{HttpKnowledgeBaseClient, KnowledgeBaseClient};
use super::error::{ConstraintError, ConstraintResult};
use super::evaluators::evaluate_constraints;
use super::parser::parse_constraints;
use crate::config::{ConstraintConfig, MapperConfig};
use crate::logging::{LogFeature, PerformanceTimer};
use crate::schema::{PropertyReference, WikibaseDataType};
use crate::validation::ValidationResult;
use futures::future::join_all;
use indexmap::IndexSet;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

const REVIEW_SCHEMA: &str = "Review the entire schema for consistency";
const REVIEW_UNSUPPORTED: &str =
    "Some constraint types are not supported and were not checked; review those values manually";

/// Validates candidate values against the constraints a knowledge base
/// declares on its properties.
///
/// Each service owns its cache; clones share it.
#[derive(Clone)]
pub struct ConstraintValidationService {
    client: Arc<dyn KnowledgeBaseClient>,
    cache: ConstraintCache,
    constraint_property: String,
}

impl ConstraintValidationService {
    pub fn new(client: Arc<dyn KnowledgeBaseClient>, config: &ConstraintConfig) -> Self {
        Self {
            client,
            cache: ConstraintCache::new(config.cache_ttl()),
            constraint_property: config.constraint_property.clone(),
        }
    }

    /// Service backed by the HTTP client for the configured instances.
    pub fn from_config(config: &MapperConfig) -> ConstraintResult<Self> {
        let client = HttpKnowledgeBaseClient::new(config.knowledge_base.clone())?;
        Ok(Self::new(Arc::new(client), &config.constraints))
    }

    pub fn cache(&self) -> &ConstraintCache {
        &self.cache
    }

    /// Constraints declared on `property_id`, served from cache within the TTL.
    pub async fn get_property_constraints(
        &self,
        instance_id: &str,
        property_id: &str,
    ) -> ConstraintResult<CachedConstraints> {
        let key = cache_key(instance_id, property_id);
        if let Some(cached) = self.cache.get(&key).await {
            crate::log_constraints_debug!("Constraint cache hit for {}", key);
            return Ok(cached);
        }

        let entity = self
            .client
            .get_entity(instance_id, property_id)
            .await
            .map_err(|e| ConstraintError::fetch(property_id, e))?;

        let constraints = parse_constraints(&entity, &self.constraint_property);
        crate::log_constraints_info!(
            "Loaded {} constraints for {} on {}",
            constraints.len(),
            property_id,
            instance_id
        );
        Ok(self.cache.insert(key, constraints).await)
    }

    /// Label and data type of a property.
    pub async fn get_property_info(
        &self,
        instance_id: &str,
        property_id: &str,
    ) -> ConstraintResult<PropertyReference> {
        let entity = self.client.get_entity(instance_id, property_id).await?;
        let datatype = entity
            .datatype
            .as_deref()
            .ok_or_else(|| ConstraintError::api(format!("{} is not a property", property_id)))?;
        let data_type: WikibaseDataType = datatype.parse().map_err(ConstraintError::Api)?;

        let reference = PropertyReference::new(entity.id.clone(), data_type);
        Ok(match entity.label("en") {
            Some(label) => reference.with_label(label),
            None => reference,
        })
    }

    /// Checks `values` against every constraint on `property_id`.
    ///
    /// Lookup failures are reported as a `system_error` violation.
    pub async fn validate_property(
        &self,
        instance_id: &str,
        property_id: &str,
        values: &[Value],
    ) -> ValidationResult {
        match self.get_property_constraints(instance_id, property_id).await {
            Ok(constraints) => {
                let result = evaluate_constraints(property_id, &constraints, values);
                crate::log_constraints_debug!(
                    "{}: {} violations, {} warnings",
                    property_id,
                    result.violations.len(),
                    result.warnings.len()
                );
                result
            }
            Err(e) => {
                crate::log_constraints_error!("Validation of {} failed: {}", property_id, e);
                ValidationResult::system_error(
                    Some(property_id.to_string()),
                    format!("Constraint validation failed: {}", e),
                )
            }
        }
    }

    /// Validates every property of `schema` concurrently and merges the results.
    pub async fn validate_schema(
        &self,
        instance_id: &str,
        schema: &BTreeMap<String, Vec<Value>>,
    ) -> ValidationResult {
        let timer = PerformanceTimer::new(
            LogFeature::Constraints,
            format!("validate {} properties on {}", schema.len(), instance_id),
        );
        let tasks = schema.iter().map(|(property_id, values)| {
            let service = self.clone();
            let instance_id = instance_id.to_string();
            let property_id = property_id.clone();
            let values = values.clone();
            tokio::spawn(async move {
                service
                    .validate_property(&instance_id, &property_id, &values)
                    .await
            })
        });

        let mut results = Vec::with_capacity(schema.len());
        for joined in join_all(tasks).await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    crate::log_constraints_error!("Schema validation task failed: {}", e);
                    return ValidationResult::system_error(
                        None,
                        format!("Schema validation failed: {}", e),
                    );
                }
            }
        }

        let result = aggregate(results);
        timer.finish();
        result
    }

    /// Clears cached constraints for `instance_id`, or all of them.
    pub async fn clear_cache(&self, instance_id: Option<&str>) {
        self.cache.clear(instance_id).await;
    }
}

fn aggregate(results: Vec<ValidationResult>) -> ValidationResult {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions = IndexSet::new();

    for result in results {
        violations.extend(result.violations);
        warnings.extend(result.warnings);
        suggestions.extend(result.suggestions);
    }

    if !violations.is_empty() {
        suggestions.insert(REVIEW_SCHEMA.to_string());
    }
    if !warnings.is_empty() {
        suggestions.insert(REVIEW_UNSUPPORTED.to_string());
    }

    ValidationResult::from_parts(violations, warnings, suggestions.into_iter().collect())
}
