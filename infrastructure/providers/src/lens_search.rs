use std::sync::Arc;

use async_trait::async_trait;

use business::domain::geometry::value_objects::PixelRect;
use business::domain::search::currency::{extract_numeric_price, infer_currency};
use business::domain::search::errors::ProviderError;
use business::domain::search::model::{ProductMatch, Provenance};
use business::domain::search::reachability::is_network_reachable;
use business::domain::search::services::{ImageCropService, ImageSimilaritySearchService};

use crate::client::SerpApiClient;
use crate::map_request_error;

/// Visual-similarity product search over SerpApi's Google Lens engine.
/// The crop is applied to the image reference before the call so the
/// backend only ever sees the marked region.
pub struct ImageSearchSerpApi {
    client: SerpApiClient,
    cropper: Arc<dyn ImageCropService>,
    region: Option<String>,
    max_output_width: u32,
}

impl ImageSearchSerpApi {
    pub fn new(
        client: SerpApiClient,
        cropper: Arc<dyn ImageCropService>,
        region: Option<String>,
        max_output_width: u32,
    ) -> Self {
        Self {
            client,
            cropper,
            region,
            max_output_width,
        }
    }

    fn parse_visual_matches(data: &serde_json::Value, region: Option<&str>) -> Vec<ProductMatch> {
        data["visual_matches"]
            .as_array()
            .map(|matches| {
                matches
                    .iter()
                    .filter_map(|entry| Self::parse_match(entry, region))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_match(entry: &serde_json::Value, region: Option<&str>) -> Option<ProductMatch> {
        let title = entry["title"].as_str()?.to_string();
        let url = entry["link"].as_str()?.to_string();

        let price = entry["price"]["value"].as_str().map(|p| p.to_string());
        let numeric_price = entry["price"]["extracted_value"]
            .as_f64()
            .or_else(|| price.as_deref().and_then(extract_numeric_price));
        // Lens sometimes reports a bare symbol in the currency field.
        let currency = entry["price"]["currency"]
            .as_str()
            .filter(|c| c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()))
            .map(|c| c.to_string())
            .or_else(|| price.as_deref().and_then(|p| infer_currency(p, region)));

        Some(ProductMatch {
            title,
            url,
            price,
            numeric_price,
            currency,
            merchant: entry["source"].as_str().map(|s| s.to_string()),
            image_url: entry["thumbnail"].as_str().map(|s| s.to_string()),
            rating: entry["rating"].as_f64(),
            review_count: entry["reviews"].as_u64().map(|r| r as u32),
            shipping_note: None,
            condition: entry["condition"].as_str().map(|s| s.to_string()),
            provenance: Provenance::Image,
        })
    }
}

#[async_trait]
impl ImageSimilaritySearchService for ImageSearchSerpApi {
    async fn search_by_image(
        &self,
        image_ref: &str,
        crop: &PixelRect,
        max_results: usize,
    ) -> Result<Vec<ProductMatch>, ProviderError> {
        if self.client.api_key.is_empty() {
            return Err(ProviderError::AuthMissing);
        }
        if !is_network_reachable(image_ref) {
            return Err(ProviderError::UnreachableReference);
        }

        let cropped = self
            .cropper
            .cropped_ref(image_ref, crop, self.max_output_width)?;

        let mut request = self.client.client.get(self.client.search_url()).query(&[
            ("engine", "google_lens"),
            ("url", cropped.as_str()),
            ("api_key", self.client.api_key.as_str()),
        ]);
        if let Some(region) = &self.region {
            request = request.query(&[("gl", region.as_str())]);
        }

        let response = request.send().await.map_err(map_request_error)?;
        if !response.status().is_success() {
            return Err(ProviderError::Http(response.status().as_u16()));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|_| ProviderError::InvalidResponse)?;

        let mut matches = Self::parse_visual_matches(&data, self.region.as_deref());
        matches.truncate(max_results);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop_url::UrlCropBuilder;
    use serde_json::json;
    use std::time::Duration;

    fn adapter() -> ImageSearchSerpApi {
        ImageSearchSerpApi::new(
            SerpApiClient::new("test-key".to_string(), Duration::from_secs(5)),
            Arc::new(UrlCropBuilder),
            Some("sg".to_string()),
            1600,
        )
    }

    #[test]
    fn should_normalize_a_visual_match() {
        let data = json!({
            "visual_matches": [{
                "title": "Stainless espresso machine",
                "link": "https://shop.example.com/p/77",
                "source": "shop.example.com",
                "thumbnail": "https://t.example.com/77.jpg",
                "rating": 4.4,
                "reviews": 210,
                "price": { "value": "S$329.00*", "extracted_value": 329.0, "currency": "$" }
            }]
        });

        let matches = ImageSearchSerpApi::parse_visual_matches(&data, Some("sg"));
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.title, "Stainless espresso machine");
        assert_eq!(m.provenance, Provenance::Image);
        assert_eq!(m.numeric_price, Some(329.0));
        // The bare "$" currency field is discarded; the price string wins.
        assert_eq!(m.currency.as_deref(), Some("SGD"));
        assert_eq!(m.merchant.as_deref(), Some("shop.example.com"));
        assert_eq!(m.review_count, Some(210));
    }

    #[test]
    fn should_skip_entries_without_title_or_link() {
        let data = json!({
            "visual_matches": [
                { "title": "No link here" },
                { "link": "https://shop.example.com/p/1" },
                { "title": "Complete", "link": "https://shop.example.com/p/2" }
            ]
        });

        let matches = ImageSearchSerpApi::parse_visual_matches(&data, None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Complete");
    }

    #[test]
    fn should_return_no_matches_for_an_empty_payload() {
        let matches = ImageSearchSerpApi::parse_visual_matches(&json!({}), None);
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn should_short_circuit_an_unreachable_reference() {
        let rect = PixelRect::new(0, 0, 100, 100).unwrap();
        let result = adapter()
            .search_by_image("data:image/jpeg;base64,AAAA", &rect, 10)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::UnreachableReference
        ));
    }

    #[tokio::test]
    async fn should_fail_fast_without_credentials() {
        let adapter = ImageSearchSerpApi::new(
            SerpApiClient::new(String::new(), Duration::from_secs(5)),
            Arc::new(UrlCropBuilder),
            None,
            1600,
        );
        let rect = PixelRect::new(0, 0, 100, 100).unwrap();
        let result = adapter
            .search_by_image("https://cdn.example.com/p.jpg", &rect, 10)
            .await;
        assert!(matches!(result.unwrap_err(), ProviderError::AuthMissing));
    }
}
