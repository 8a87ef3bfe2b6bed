use async_trait::async_trait;

use super::super::errors::ProviderError;
use super::super::services::DetectedObject;

pub struct DetectObjectsParams {
    pub image_ref: String,
}

#[async_trait]
pub trait DetectObjectsUseCase: Send + Sync {
    async fn execute(&self, params: DetectObjectsParams)
    -> Result<Vec<DetectedObject>, ProviderError>;
}
