use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded analysis. History lives independently of the result
/// cache: entries survive cache expiry and only the log's own cap bounds
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub input_fingerprint: String,
    pub object_count: usize,
    pub provider: String,
}

impl HistoryEntry {
    pub fn new(
        input_fingerprint: impl Into<String>,
        object_count: usize,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input_fingerprint: input_fingerprint.into(),
            object_count,
            provider: provider.into(),
        }
    }
}
