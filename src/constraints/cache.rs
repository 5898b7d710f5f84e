//! TTL cache of parsed constraint lists.

use super::types::PropertyConstraint;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub type CachedConstraints = Arc<Vec<PropertyConstraint>>;

/// Key under which a property's constraints are cached.
pub fn cache_key(instance_id: &str, property_id: &str) -> String {
    format!("{}:{}", instance_id, property_id)
}

struct CacheEntry {
    constraints: CachedConstraints,
    expires_at: Instant,
    generation: u64,
}

struct CacheInner {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    next_generation: AtomicU64,
}

/// Constraint lists keyed by `instance:property`, each evicted after the TTL.
///
/// Clones share the same entries.
#[derive(Clone)]
pub struct ConstraintCache {
    inner: Arc<CacheInner>,
}

impl ConstraintCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                ttl,
                entries: RwLock::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Returns the cached list if present and not yet expired.
    pub async fn get(&self, key: &str) -> Option<CachedConstraints> {
        let entries = self.inner.entries.read().await;
        entries
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| Arc::clone(&entry.constraints))
    }

    /// Stores `constraints` and schedules their eviction.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn insert(&self, key: String, constraints: Vec<PropertyConstraint>) -> CachedConstraints {
        let constraints = Arc::new(constraints);
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let expires_at = Instant::now() + self.inner.ttl;

        self.inner.entries.write().await.insert(
            key.clone(),
            CacheEntry {
                constraints: Arc::clone(&constraints),
                expires_at,
                generation,
            },
        );

        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(evict_after(weak, key, generation, expires_at));

        constraints
    }

    /// Drops entries for `instance_id`, or everything when `None`.
    pub async fn clear(&self, instance_id: Option<&str>) {
        let mut entries = self.inner.entries.write().await;
        match instance_id {
            Some(instance_id) => {
                let prefix = format!("{}:", instance_id);
                entries.retain(|key, _| !key.starts_with(&prefix));
            }
            None => entries.clear(),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

async fn evict_after(inner: Weak<CacheInner>, key: String, generation: u64, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut entries = inner.entries.write().await;
    // A newer insert under the same key owns its own timer
    if entries.get(&key).map_or(false, |e| e.generation == generation) {
        entries.remove(&key);
        crate::log_constraints_debug!("Evicted cached constraints for {}", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::types::ConstraintKind;

    fn single_value() -> Vec<PropertyConstraint> {
        vec![PropertyConstraint::new(ConstraintKind::SingleValue)]
    }

    #[tokio::test]
    async fn returns_same_reference_within_ttl() {
        let cache = ConstraintCache::new(Duration::from_secs(60));
        let stored = cache.insert(cache_key("wikidata", "P31"), single_value()).await;
        let hit = cache.get("wikidata:P31").await.unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
    }

    #[tokio::test]
    async fn entries_expire() {
        let cache = ConstraintCache::new(Duration::from_millis(20));
        cache.insert(cache_key("wikidata", "P31"), single_value()).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(cache.get("wikidata:P31").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn clear_by_instance_prefix() {
        let cache = ConstraintCache::new(Duration::from_secs(60));
        cache.insert(cache_key("wikidata", "P31"), single_value()).await;
        cache.insert(cache_key("wikidata", "P21"), single_value()).await;
        cache.insert(cache_key("wikidata-test", "P31"), single_value()).await;

        cache.clear(Some("wikidata")).await;
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("wikidata-test:P31").await.is_some());

        cache.clear(None).await;
        assert!(cache.is_empty().await);
    }
}
