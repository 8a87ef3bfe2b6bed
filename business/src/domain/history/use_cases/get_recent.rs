use async_trait::async_trait;

use crate::domain::errors::CacheError;

use super::super::model::HistoryEntry;

pub struct GetRecentAnalysesParams {
    pub limit: usize,
}

#[async_trait]
pub trait GetRecentAnalysesUseCase: Send + Sync {
    async fn execute(
        &self,
        params: GetRecentAnalysesParams,
    ) -> Result<Vec<HistoryEntry>, CacheError>;
}
