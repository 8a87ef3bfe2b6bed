use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::CacheError;

/// One stored cache entry: the serialized payload plus the bookkeeping
/// needed for TTL and eviction decisions. Owned exclusively by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub ttl_secs: i64,
}

impl StoredEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::seconds(self.ttl_secs)
    }
}

/// Contract over the concrete cache storage medium. The medium is
/// external; expiry, corruption handling and eviction policy live in
/// [`ResultCache`](crate::domain::cache::result_cache::ResultCache).
#[async_trait]
pub trait CacheStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, CacheError>;
    async fn put(&self, key: &str, value: String, ttl_secs: i64) -> Result<(), CacheError>;
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
    /// Evicts up to `count` entries, oldest first. Returns how many went.
    async fn evict_oldest(&self, count: usize) -> Result<usize, CacheError>;
    /// Removes every entry whose key carries `fingerprint`. Returns how
    /// many went.
    async fn remove_matching(&self, fingerprint: &str) -> Result<usize, CacheError>;
    async fn len(&self) -> Result<usize, CacheError>;
}
