use async_trait::async_trait;

use business::domain::search::currency::{extract_numeric_price, infer_currency};
use business::domain::search::errors::ProviderError;
use business::domain::search::model::{ProductMatch, Provenance};
use business::domain::search::services::KeywordSearchService;

use crate::client::SerpApiClient;
use crate::map_request_error;

/// Keyword product search over SerpApi's Google Shopping engine.
pub struct KeywordSearchSerpApi {
    client: SerpApiClient,
    region: Option<String>,
}

impl KeywordSearchSerpApi {
    pub fn new(client: SerpApiClient, region: Option<String>) -> Self {
        Self { client, region }
    }

    fn parse_shopping_results(data: &serde_json::Value, region: Option<&str>) -> Vec<ProductMatch> {
        data["shopping_results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|entry| Self::parse_result(entry, region))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_result(entry: &serde_json::Value, region: Option<&str>) -> Option<ProductMatch> {
        let title = entry["title"].as_str()?.to_string();
        let url = entry["product_link"]
            .as_str()
            .or_else(|| entry["link"].as_str())?
            .to_string();

        let price = entry["price"].as_str().map(|p| p.to_string());
        let numeric_price = entry["extracted_price"]
            .as_f64()
            .or_else(|| price.as_deref().and_then(extract_numeric_price));
        let currency = price.as_deref().and_then(|p| infer_currency(p, region));

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
            shipping_note: entry["delivery"].as_str().map(|s| s.to_string()),
            condition: entry["second_hand_condition"].as_str().map(|s| s.to_string()),
            provenance: Provenance::Keyword,
        })
    }
}

#[async_trait]
impl KeywordSearchService for KeywordSearchSerpApi {
    async fn search_by_keyword(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ProductMatch>, ProviderError> {
        if self.client.api_key.is_empty() {
            return Err(ProviderError::AuthMissing);
        }

        let num = max_results.to_string();
        let mut request = self.client.client.get(self.client.search_url()).query(&[
            ("engine", "google_shopping"),
            ("q", query),
            ("num", num.as_str()),
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

        let mut matches = Self::parse_shopping_results(&data, self.region.as_deref());
        matches.truncate(max_results);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn should_normalize_a_shopping_result() {
        let data = json!({
            "shopping_results": [{
                "title": "Coffee machine 1.2L",
                "product_link": "https://www.google.com/shopping/product/1",
                "source": "Lazada",
                "price": "$89.00",
                "extracted_price": 89.0,
                "thumbnail": "https://t.example.com/1.jpg",
                "rating": 4.7,
                "reviews": 1520,
                "delivery": "Free delivery",
                "second_hand_condition": "refurbished"
            }]
        });

        let matches = KeywordSearchSerpApi::parse_shopping_results(&data, Some("sg"));
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.provenance, Provenance::Keyword);
        assert_eq!(m.numeric_price, Some(89.0));
        assert_eq!(m.currency.as_deref(), Some("SGD"));
        assert_eq!(m.merchant.as_deref(), Some("Lazada"));
        assert_eq!(m.shipping_note.as_deref(), Some("Free delivery"));
        assert_eq!(m.condition.as_deref(), Some("refurbished"));
    }

    #[test]
    fn should_fall_back_to_the_plain_link_field() {
        let data = json!({
            "shopping_results": [{
                "title": "Coffee machine",
                "link": "https://shop.example.com/p/2",
                "price": "€49,90"
            }]
        });

        let matches = KeywordSearchSerpApi::parse_shopping_results(&data, None);
        assert_eq!(matches[0].url, "https://shop.example.com/p/2");
        assert_eq!(matches[0].currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn should_extract_the_price_when_no_extracted_value_is_present() {
        let data = json!({
            "shopping_results": [{
                "title": "Coffee machine",
                "link": "https://shop.example.com/p/3",
                "price": "$1,299.99"
            }]
        });

        let matches = KeywordSearchSerpApi::parse_shopping_results(&data, Some("us"));
        assert_eq!(matches[0].numeric_price, Some(1299.99));
        assert_eq!(matches[0].currency.as_deref(), Some("USD"));
    }

    #[tokio::test]
    async fn should_fail_fast_without_credentials() {
        let adapter = KeywordSearchSerpApi::new(
            SerpApiClient::new(String::new(), Duration::from_secs(5)),
            None,
        );
        let result = adapter.search_by_keyword("coffee machine", 10).await;
        assert!(matches!(result.unwrap_err(), ProviderError::AuthMissing));
    }
}
