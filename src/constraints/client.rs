//! Access to the knowledge-base entity lookup API.

use super::entity::{EntityRecord, GetEntitiesResponse};
use super::error::{ConstraintError, ConstraintResult};
use crate::config::KnowledgeBaseConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Looks up entities on a Wikibase instance.
#[async_trait]
pub trait KnowledgeBaseClient: Send + Sync {
    async fn get_entity(&self, instance_id: &str, entity_id: &str) -> ConstraintResult<EntityRecord>;
}

/// `wbgetentities` client over HTTP.
pub struct HttpKnowledgeBaseClient {
    client: Client,
    config: KnowledgeBaseConfig,
}

impl HttpKnowledgeBaseClient {
    pub fn new(config: KnowledgeBaseConfig) -> ConstraintResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ConstraintError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Make a single API request
    async fn request_entity(&self, api_url: &str, entity_id: &str) -> ConstraintResult<EntityRecord> {
        let response = self
            .client
            .get(api_url)
            .query(&[
                ("action", "wbgetentities"),
                ("ids", entity_id),
                ("props", "labels|descriptions|aliases|claims|datatype"),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ConstraintError::api(format!(
                "Request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: GetEntitiesResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(ConstraintError::api(format!("{}: {}", error.code, error.info)));
        }

        let raw = body
            .entities
            .get(entity_id)
            .ok_or_else(|| ConstraintError::EntityNotFound(entity_id.to_string()))?;
        if raw.get("missing").is_some() {
            return Err(ConstraintError::EntityNotFound(entity_id.to_string()));
        }

        Ok(serde_json::from_value(raw.clone())?)
    }
}

#[async_trait]
impl KnowledgeBaseClient for HttpKnowledgeBaseClient {
    async fn get_entity(&self, instance_id: &str, entity_id: &str) -> ConstraintResult<EntityRecord> {
        let api_url = self
            .config
            .api_url(instance_id)
            .ok_or_else(|| ConstraintError::UnknownInstance(instance_id.to_string()))?;

        let mut last_error = None;

        for attempt in 1..=self.config.max_retries {
            crate::log_constraints_debug!(
                "Fetching {} from {} (attempt {} of {})",
                entity_id,
                instance_id,
                attempt,
                self.config.max_retries
            );

            match self.request_entity(api_url, entity_id).await {
                Ok(entity) => return Ok(entity),
                // A missing entity will not appear on retry
                Err(e @ ConstraintError::EntityNotFound(_)) => return Err(e),
                Err(e) => {
                    crate::log_constraints_warn!(
                        "Lookup of {} on {} failed on attempt {}: {}",
                        entity_id,
                        instance_id,
                        attempt,
                        e
                    );
                    last_error = Some(e);

                    if attempt < self.config.max_retries {
                        // Exponential backoff
                        let delay = Duration::from_millis(250 * 2_u64.pow(attempt - 1));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ConstraintError::api("All API attempts failed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_instance_fails_without_request() {
        let client = HttpKnowledgeBaseClient::new(KnowledgeBaseConfig::default()).unwrap();
        let result = client.get_entity("nowhere", "P31").await;
        assert!(matches!(result, Err(ConstraintError::UnknownInstance(_))));
    }
}
