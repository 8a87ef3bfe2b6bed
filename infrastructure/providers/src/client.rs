use std::time::Duration;

use reqwest::Client;

/// Shared SerpApi HTTP client configuration. Credentials and the call
/// timeout are supplied explicitly at construction, never read from the
/// environment.
pub struct SerpApiClient {
    pub client: Client,
    pub api_key: String,
    pub base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: "https://serpapi.com".to_string(),
        }
    }

    /// Returns the search endpoint URL.
    pub fn search_url(&self) -> String {
        format!("{}/search.json", self.base_url)
    }
}
