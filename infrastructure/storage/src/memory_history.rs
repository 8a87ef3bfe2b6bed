use std::sync::Mutex;

use async_trait::async_trait;

use business::domain::errors::CacheError;
use business::domain::history::log::HistoryLog;
use business::domain::history::model::HistoryEntry;

/// In-memory analysis log: bounded, de-duplicated by input fingerprint,
/// most recent first.
pub struct MemoryHistoryLog {
    entries: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl MemoryHistoryLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            cap,
        }
    }
}

#[async_trait]
impl HistoryLog for MemoryHistoryLog {
    async fn record(&self, entry: HistoryEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::WriteFailure)?;

        // A repeat fingerprint re-touches the existing entry in place:
        // same id, fresh timestamp and fields, moved to the front.
        if let Some(pos) = entries
            .iter()
            .position(|e| e.input_fingerprint == entry.input_fingerprint)
        {
            let mut existing = entries.remove(pos);
            existing.timestamp = entry.timestamp;
            existing.object_count = entry.object_count;
            existing.provider = entry.provider;
            entries.insert(0, existing);
        } else {
            entries.insert(0, entry);
            entries.truncate(self.cap);
        }

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::ReadCorrupt)?;
        Ok(entries.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_list_entries_most_recent_first() {
        let log = MemoryHistoryLog::new(10);
        log.record(HistoryEntry::new("aaa", 1, "keyword")).await.unwrap();
        log.record(HistoryEntry::new("bbb", 2, "keyword")).await.unwrap();

        let entries = log.recent(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].input_fingerprint, "bbb");
        assert_eq!(entries[1].input_fingerprint, "aaa");
    }

    #[tokio::test]
    async fn should_retouch_a_repeat_fingerprint_in_place() {
        let log = MemoryHistoryLog::new(10);
        log.record(HistoryEntry::new("aaa", 1, "keyword")).await.unwrap();
        let original = log.recent(1).await.unwrap()[0].clone();

        log.record(HistoryEntry::new("bbb", 2, "keyword")).await.unwrap();
        log.record(HistoryEntry::new("aaa", 3, "image+keyword")).await.unwrap();

        let entries = log.recent(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].input_fingerprint, "aaa");
        // Same logical entry, refreshed.
        assert_eq!(entries[0].id, original.id);
        assert_eq!(entries[0].object_count, 3);
        assert_eq!(entries[0].provider, "image+keyword");
        assert!(entries[0].timestamp >= original.timestamp);
    }

    #[tokio::test]
    async fn should_cap_the_log_at_its_configured_size() {
        let log = MemoryHistoryLog::new(3);
        for i in 0..5 {
            log.record(HistoryEntry::new(format!("fp-{i}"), i, "keyword"))
                .await
                .unwrap();
        }

        let entries = log.recent(10).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].input_fingerprint, "fp-4");
        assert_eq!(entries[2].input_fingerprint, "fp-2");
    }

    #[tokio::test]
    async fn should_limit_the_returned_slice() {
        let log = MemoryHistoryLog::new(10);
        for i in 0..4 {
            log.record(HistoryEntry::new(format!("fp-{i}"), i, "keyword"))
                .await
                .unwrap();
        }

        let entries = log.recent(2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].input_fingerprint, "fp-3");
    }
}
