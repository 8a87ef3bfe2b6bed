use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::CacheError;
use crate::domain::history::log::HistoryLog;
use crate::domain::history::model::HistoryEntry;
use crate::domain::history::use_cases::get_recent::{
    GetRecentAnalysesParams, GetRecentAnalysesUseCase,
};
use crate::domain::logger::Logger;

pub struct GetRecentAnalysesUseCaseImpl {
    pub history: Arc<dyn HistoryLog>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetRecentAnalysesUseCase for GetRecentAnalysesUseCaseImpl {
    async fn execute(
        &self,
        params: GetRecentAnalysesParams,
    ) -> Result<Vec<HistoryEntry>, CacheError> {
        let entries = self.history.recent(params.limit).await?;

        self.logger
            .debug(&format!("Loaded {} recent analyses", entries.len()));

        Ok(entries)
    }
}
