use async_trait::async_trait;

use crate::domain::errors::CacheError;

use super::model::HistoryEntry;

/// Contract over the bounded, de-duplicated analysis log. Most recent
/// first; recording an already-known fingerprint re-touches the existing
/// entry in place instead of duplicating it. Read-only context for the
/// caller; never consulted by orchestration.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    async fn record(&self, entry: HistoryEntry) -> Result<(), CacheError>;
    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, CacheError>;
}
