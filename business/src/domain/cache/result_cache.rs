use std::sync::Arc;

use chrono::Utc;

use crate::domain::errors::CacheError;
use crate::domain::logger::Logger;
use crate::domain::search::model::SearchResult;

use super::store::CacheStorage;

/// How many entries to free when the storage medium runs out of quota.
const EVICTION_BATCH: usize = 8;

/// Best-effort result cache over an external storage medium.
///
/// Expiry is applied on read (expired entries read as absent and are
/// purged lazily), corrupt payloads read as misses and are purged, and
/// writes survive one evict-and-retry before being dropped. A cache
/// failure never fails the search that triggered it.
pub struct ResultCache {
    storage: Arc<dyn CacheStorage>,
    logger: Arc<dyn Logger>,
    max_entries: usize,
}

impl ResultCache {
    pub fn new(storage: Arc<dyn CacheStorage>, logger: Arc<dyn Logger>, max_entries: usize) -> Self {
        Self {
            storage,
            logger,
            max_entries,
        }
    }

    pub async fn get(&self, key: &str) -> Option<SearchResult> {
        let entry = match self.storage.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(_) => return None,
        };

        if entry.is_expired(Utc::now()) {
            let _ = self.storage.remove(key).await;
            return None;
        }

        match serde_json::from_str::<SearchResult>(&entry.value) {
            Ok(result) => Some(result),
            Err(_) => {
                self.logger
                    .warn(&format!("Purging corrupt cache entry: {}", key));
                let _ = self.storage.remove(key).await;
                None
            }
        }
    }

    pub async fn put(&self, key: &str, result: &SearchResult, ttl_secs: i64) {
        let payload = match serde_json::to_string(result) {
            Ok(payload) => payload,
            Err(_) => return,
        };

        if let Ok(count) = self.storage.len().await
            && count >= self.max_entries
        {
            let excess = count + 1 - self.max_entries;
            let _ = self.storage.evict_oldest(excess).await;
        }

        match self.storage.put(key, payload.clone(), ttl_secs).await {
            Ok(()) => {}
            Err(CacheError::QuotaExceeded) | Err(CacheError::WriteFailure) => {
                let _ = self.storage.evict_oldest(EVICTION_BATCH).await;
                if self.storage.put(key, payload, ttl_secs).await.is_err() {
                    self.logger
                        .warn(&format!("Dropping cache write after retry: {}", key));
                }
            }
            Err(_) => {
                self.logger.warn(&format!("Dropping cache write: {}", key));
            }
        }
    }

    /// Removes every entry for one input fingerprint (the refresh path).
    pub async fn invalidate(&self, fingerprint: &str) {
        if let Err(err) = self.storage.remove_matching(fingerprint).await {
            self.logger
                .warn(&format!("Cache invalidation failed: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::store::StoredEntry;
    use crate::domain::search::model::{ProductMatch, Provenance, SearchType};
    use async_trait::async_trait;
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Store {}

        #[async_trait]
        impl CacheStorage for Store {
            async fn get(&self, key: &str) -> Result<Option<StoredEntry>, CacheError>;
            async fn put(&self, key: &str, value: String, ttl_secs: i64) -> Result<(), CacheError>;
            async fn remove(&self, key: &str) -> Result<(), CacheError>;
            async fn evict_oldest(&self, count: usize) -> Result<usize, CacheError>;
            async fn remove_matching(&self, fingerprint: &str) -> Result<usize, CacheError>;
            async fn len(&self) -> Result<usize, CacheError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    fn sample_result() -> SearchResult {
        SearchResult {
            matches: vec![ProductMatch::bare(
                "Desk lamp",
                "https://example.com/p/9",
                Provenance::Keyword,
            )],
            search_type: SearchType::Keyword,
            source: "keyword".to_string(),
            processing_time_ms: 42,
            success: true,
            error: None,
        }
    }

    fn entry_with(value: String, age_secs: i64, ttl_secs: i64) -> StoredEntry {
        StoredEntry {
            value,
            created_at: Utc::now() - Duration::seconds(age_secs),
            ttl_secs,
        }
    }

    #[tokio::test]
    async fn should_return_a_fresh_entry() {
        let payload = serde_json::to_string(&sample_result()).unwrap();
        let mut store = MockStore::new();
        store
            .expect_get()
            .with(eq("object_search:abc"))
            .returning(move |_| Ok(Some(entry_with(payload.clone(), 0, 3600))));

        let cache = ResultCache::new(Arc::new(store), mock_logger(), 100);
        let hit = cache.get("object_search:abc").await;
        assert_eq!(hit, Some(sample_result()));
    }

    #[tokio::test]
    async fn should_treat_an_expired_entry_as_absent_and_purge_it() {
        let payload = serde_json::to_string(&sample_result()).unwrap();
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(entry_with(payload.clone(), 7200, 3600))));
        store
            .expect_remove()
            .with(eq("object_search:abc"))
            .times(1)
            .returning(|_| Ok(()));

        let cache = ResultCache::new(Arc::new(store), mock_logger(), 100);
        assert_eq!(cache.get("object_search:abc").await, None);
    }

    #[tokio::test]
    async fn should_treat_a_corrupt_entry_as_a_miss_and_purge_it() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some(entry_with("not json".to_string(), 0, 3600))));
        store.expect_remove().times(1).returning(|_| Ok(()));

        let cache = ResultCache::new(Arc::new(store), mock_logger(), 100);
        assert_eq!(cache.get("object_search:abc").await, None);
    }

    #[tokio::test]
    async fn should_evict_and_retry_once_on_quota_failure() {
        let mut store = MockStore::new();
        store.expect_len().returning(|| Ok(0));
        let mut put_calls = mockall::Sequence::new();
        store
            .expect_put()
            .times(1)
            .in_sequence(&mut put_calls)
            .returning(|_, _, _| Err(CacheError::QuotaExceeded));
        store
            .expect_evict_oldest()
            .with(eq(EVICTION_BATCH))
            .times(1)
            .returning(|n| Ok(n));
        store
            .expect_put()
            .times(1)
            .in_sequence(&mut put_calls)
            .returning(|_, _, _| Ok(()));

        let cache = ResultCache::new(Arc::new(store), mock_logger(), 100);
        cache.put("object_search:abc", &sample_result(), 3600).await;
    }

    #[tokio::test]
    async fn should_drop_the_write_silently_when_the_retry_fails() {
        let mut store = MockStore::new();
        store.expect_len().returning(|| Ok(0));
        store
            .expect_put()
            .times(2)
            .returning(|_, _, _| Err(CacheError::QuotaExceeded));
        store.expect_evict_oldest().times(1).returning(|n| Ok(n));

        let cache = ResultCache::new(Arc::new(store), mock_logger(), 100);
        // Must not panic or surface an error.
        cache.put("object_search:abc", &sample_result(), 3600).await;
    }

    #[tokio::test]
    async fn should_evict_oldest_entries_past_the_capacity_cap() {
        let mut store = MockStore::new();
        store.expect_len().returning(|| Ok(100));
        store
            .expect_evict_oldest()
            .with(eq(1usize))
            .times(1)
            .returning(|n| Ok(n));
        store.expect_put().returning(|_, _, _| Ok(()));

        let cache = ResultCache::new(Arc::new(store), mock_logger(), 100);
        cache.put("object_search:abc", &sample_result(), 3600).await;
    }

    #[tokio::test]
    async fn should_invalidate_by_fingerprint() {
        let mut store = MockStore::new();
        store
            .expect_remove_matching()
            .with(eq("abc123"))
            .times(1)
            .returning(|_| Ok(2));

        let cache = ResultCache::new(Arc::new(store), mock_logger(), 100);
        cache.invalidate("abc123").await;
    }
}
