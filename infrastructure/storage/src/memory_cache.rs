use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use business::domain::cache::store::{CacheStorage, StoredEntry};
use business::domain::errors::CacheError;

/// In-memory cache storage with a byte quota, for embedding and tests.
/// Concurrent writes to the same key are last-write-wins; the cache is
/// best-effort, not a source of truth.
pub struct MemoryCacheStorage {
    entries: Mutex<HashMap<String, StoredEntry>>,
    max_bytes: usize,
}

impl MemoryCacheStorage {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_bytes,
        }
    }

    fn used_bytes(entries: &HashMap<String, StoredEntry>) -> usize {
        entries
            .iter()
            .map(|(key, entry)| key.len() + entry.value.len())
            .sum()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::ReadCorrupt)?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String, ttl_secs: i64) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::WriteFailure)?;

        let occupied = Self::used_bytes(&entries)
            - entries.get(key).map_or(0, |e| key.len() + e.value.len());
        if occupied + key.len() + value.len() > self.max_bytes {
            return Err(CacheError::QuotaExceeded);
        }

        entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                created_at: Utc::now(),
                ttl_secs,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::WriteFailure)?;
        entries.remove(key);
        Ok(())
    }

    async fn evict_oldest(&self, count: usize) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::WriteFailure)?;

        let mut keys: Vec<(String, chrono::DateTime<Utc>)> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.created_at))
            .collect();
        keys.sort_by_key(|(_, created_at)| *created_at);

        let mut evicted = 0;
        for (key, _) in keys.into_iter().take(count) {
            entries.remove(&key);
            evicted += 1;
        }
        Ok(evicted)
    }

    async fn remove_matching(&self, fingerprint: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::WriteFailure)?;
        let before = entries.len();
        entries.retain(|key, _| !key.contains(fingerprint));
        Ok(before - entries.len())
    }

    async fn len(&self) -> Result<usize, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::ReadCorrupt)?;
        Ok(entries.len())
    }
}
