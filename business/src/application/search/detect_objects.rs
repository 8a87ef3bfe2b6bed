use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::cache::model::request_fingerprint;
use crate::domain::history::log::HistoryLog;
use crate::domain::history::model::HistoryEntry;
use crate::domain::logger::Logger;
use crate::domain::search::errors::ProviderError;
use crate::domain::search::services::{DetectedObject, ObjectDetectionService};
use crate::domain::search::use_cases::detect::{DetectObjectsParams, DetectObjectsUseCase};

pub struct DetectObjectsUseCaseImpl {
    pub detector: Arc<dyn ObjectDetectionService>,
    pub history: Arc<dyn HistoryLog>,
    pub logger: Arc<dyn Logger>,
}

impl DetectObjectsUseCaseImpl {
    /// Normalizes raw detections: drops objects whose box violates the
    /// normalized-coordinate invariant and clamps confidence into [0, 1].
    fn normalize(&self, objects: Vec<DetectedObject>) -> Vec<DetectedObject> {
        objects
            .into_iter()
            .filter(|object| {
                let valid = object.bounding_box.validate().is_ok();
                if !valid {
                    self.logger.warn(&format!(
                        "Dropping detection with out-of-range box: {}",
                        object.label
                    ));
                }
                valid
            })
            .map(|mut object| {
                object.confidence = object.confidence.clamp(0.0, 1.0);
                object
            })
            .collect()
    }
}

#[async_trait]
impl DetectObjectsUseCase for DetectObjectsUseCaseImpl {
    async fn execute(
        &self,
        params: DetectObjectsParams,
    ) -> Result<Vec<DetectedObject>, ProviderError> {
        self.logger.info("Detecting objects in image");

        let objects = self.detector.detect(&params.image_ref).await?;
        let objects = self.normalize(objects);

        let fingerprint = request_fingerprint(None, Some(&params.image_ref), None);
        let entry = HistoryEntry::new(fingerprint, objects.len(), "detection");
        if let Err(err) = self.history.record(entry).await {
            self.logger.warn(&format!("History write failed: {}", err));
        }

        self.logger
            .info(&format!("Detected {} objects", objects.len()));

        Ok(objects)
    }
}
