use async_trait::async_trait;

use crate::domain::geometry::value_objects::{BoundingBox, PixelRect};

use super::errors::ProviderError;
use super::model::ProductMatch;

/// An object located by a detection backend, normalized to the domain
/// model: a label, a confidence in [0, 1], and a normalized bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedObject {
    pub label: String,
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

/// Service port for visual-similarity product search. The image reference
/// must be network-reachable; implementations short-circuit with
/// [`ProviderError::UnreachableReference`] otherwise.
#[async_trait]
pub trait ImageSimilaritySearchService: Send + Sync {
    async fn search_by_image(
        &self,
        image_ref: &str,
        crop: &PixelRect,
        max_results: usize,
    ) -> Result<Vec<ProductMatch>, ProviderError>;
}

/// Service port for keyword-based priced product listings.
#[async_trait]
pub trait KeywordSearchService: Send + Sync {
    async fn search_by_keyword(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ProductMatch>, ProviderError>;
}

/// Service port for object detection on a reference image.
#[async_trait]
pub trait ObjectDetectionService: Send + Sync {
    async fn detect(&self, image_ref: &str) -> Result<Vec<DetectedObject>, ProviderError>;
}

/// Service port for the static fallback tier: one deterministic search
/// link per configured merchant. Never calls a network service and never
/// fails.
pub trait FallbackLinkService: Send + Sync {
    fn links(&self, query: &str) -> Vec<ProductMatch>;
}

/// Service port for the image-crop provider: given a reachable image
/// reference, produce a new reference encoding the absolute crop rect,
/// with the output width capped and conflicting resize hints removed.
pub trait ImageCropService: Send + Sync {
    fn cropped_ref(
        &self,
        image_ref: &str,
        rect: &PixelRect,
        max_output_width: u32,
    ) -> Result<String, ProviderError>;
}
