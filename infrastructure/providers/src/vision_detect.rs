use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use business::domain::geometry::value_objects::BoundingBox;
use business::domain::search::errors::ProviderError;
use business::domain::search::reachability::is_network_reachable;
use business::domain::search::services::{DetectedObject, ObjectDetectionService};

use crate::map_request_error;

const MAX_DETECTIONS: u32 = 20;

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Deserialize)]
struct AnnotateResult {
    #[serde(rename = "localizedObjectAnnotations", default)]
    annotations: Vec<ObjectAnnotation>,
}

#[derive(Deserialize)]
struct ObjectAnnotation {
    name: String,
    #[serde(default)]
    score: f64,
    #[serde(rename = "boundingPoly")]
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Deserialize)]
struct BoundingPoly {
    #[serde(rename = "normalizedVertices", default)]
    normalized_vertices: Vec<Vertex>,
}

/// Vision omits zero-valued vertex components; a missing field reads as 0.
#[derive(Deserialize, Clone, Copy)]
struct Vertex {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

/// Object detection over Google Cloud Vision object localization. The
/// backend reports each object as a polygon of normalized vertices; the
/// normalize step reduces that to an axis-aligned bounding box.
pub struct VisionDetectionGoogle {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl VisionDetectionGoogle {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: "https://vision.googleapis.com/v1".to_string(),
        }
    }

    fn annotate_url(&self) -> String {
        format!("{}/images:annotate?key={}", self.base_url, self.api_key)
    }

    fn normalize(response: AnnotateResponse) -> Vec<DetectedObject> {
        response
            .responses
            .into_iter()
            .flat_map(|result| result.annotations)
            .filter_map(Self::normalize_annotation)
            .collect()
    }

    fn normalize_annotation(annotation: ObjectAnnotation) -> Option<DetectedObject> {
        let vertices = annotation.bounding_poly?.normalized_vertices;
        if vertices.is_empty() {
            return None;
        }

        let min_x = vertices.iter().map(|v| v.x).fold(f64::INFINITY, f64::min);
        let max_x = vertices.iter().map(|v| v.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = vertices.iter().map(|v| v.y).fold(f64::INFINITY, f64::min);
        let max_y = vertices.iter().map(|v| v.y).fold(f64::NEG_INFINITY, f64::max);

        let bounding_box = BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y).ok()?;

        Some(DetectedObject {
            label: annotation.name,
            confidence: annotation.score,
            bounding_box,
        })
    }
}

#[async_trait]
impl ObjectDetectionService for VisionDetectionGoogle {
    async fn detect(&self, image_ref: &str) -> Result<Vec<DetectedObject>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::AuthMissing);
        }
        if !is_network_reachable(image_ref) {
            return Err(ProviderError::UnreachableReference);
        }

        let body = json!({
            "requests": [{
                "image": { "source": { "imageUri": image_ref } },
                "features": [{ "type": "OBJECT_LOCALIZATION", "maxResults": MAX_DETECTIONS }]
            }]
        });

        let response = self
            .client
            .post(self.annotate_url())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(ProviderError::Http(response.status().as_u16()));
        }

        let data: AnnotateResponse = response
            .json()
            .await
            .map_err(|_| ProviderError::InvalidResponse)?;

        Ok(Self::normalize(data))
    }
}
