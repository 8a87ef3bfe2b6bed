use serde::{Deserialize, Serialize};

/// Which search strategy produced a given product match. Assigned by the
/// originating adapter and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Image,
    Keyword,
    Fallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Image => write!(f, "image"),
            Provenance::Keyword => write!(f, "keyword"),
            Provenance::Fallback => write!(f, "fallback"),
        }
    }
}

impl std::str::FromStr for Provenance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Provenance::Image),
            "keyword" => Ok(Provenance::Keyword),
            "fallback" => Ok(Provenance::Fallback),
            _ => Err(format!("Invalid provenance: {}", s)),
        }
    }
}

/// The strategy mix that produced a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    ImageSimilarity,
    Keyword,
    Combined,
    Fallback,
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchType::ImageSimilarity => write!(f, "image_similarity"),
            SearchType::Keyword => write!(f, "keyword"),
            SearchType::Combined => write!(f, "combined"),
            SearchType::Fallback => write!(f, "fallback"),
        }
    }
}

/// A purchasable product candidate as normalized from one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub title: String,
    pub url: String,
    pub price: Option<String>,
    pub numeric_price: Option<f64>,
    pub currency: Option<String>,
    pub merchant: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub shipping_note: Option<String>,
    pub condition: Option<String>,
    pub provenance: Provenance,
}

impl ProductMatch {
    /// A match carrying only the fields every provider supplies.
    pub fn bare(title: impl Into<String>, url: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            price: None,
            numeric_price: None,
            currency: None,
            merchant: None,
            image_url: None,
            rating: None,
            review_count: None,
            shipping_note: None,
            condition: None,
            provenance,
        }
    }
}

/// The ranked, provenance-tagged outcome of one orchestrator invocation.
/// Built once and immutable; also the cache payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub matches: Vec<ProductMatch>,
    pub search_type: SearchType,
    pub source: String,
    pub processing_time_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

/// A labeled alternative for what the detected object might be, as
/// reported by a detection or annotation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCandidate {
    pub name: String,
    pub score: f64,
}

/// Per-request options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Skip the cache and invalidate existing entries for this input.
    pub force_refresh: bool,
    /// A caller-supplied label known to be better than the detection one.
    pub best_guess_label: Option<String>,
    /// Entity candidates from annotation, considered above the configured
    /// confidence threshold.
    pub entities: Vec<LabelCandidate>,
}

/// Orchestrator construction-time configuration. Passed in explicitly;
/// nothing is read from the process environment.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_results: usize,
    pub entity_confidence_threshold: f64,
    pub provider_timeout_ms: u64,
    pub cache_ttl_secs: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            entity_confidence_threshold: 0.5,
            provider_timeout_ms: 10_000,
            cache_ttl_secs: 24 * 60 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_provenance_through_str() {
        let provenance: Provenance = "keyword".parse().unwrap();
        assert_eq!(provenance, Provenance::Keyword);
        assert_eq!(format!("{}", Provenance::Image), "image");
    }

    #[test]
    fn should_reject_unknown_provenance() {
        let result: Result<Provenance, _> = "organic".parse();
        assert!(result.is_err());
    }

    #[test]
    fn should_serialize_a_search_result_as_a_cacheable_payload() {
        let result = SearchResult {
            matches: vec![ProductMatch::bare(
                "Espresso machine",
                "https://example.com/p/1",
                Provenance::Keyword,
            )],
            search_type: SearchType::Keyword,
            source: "keyword".to_string(),
            processing_time_ms: 120,
            success: true,
            error: None,
        };

        let payload = serde_json::to_string(&result).unwrap();
        let restored: SearchResult = serde_json::from_str(&payload).unwrap();
        assert_eq!(restored, result);
    }
}
