use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::cache::model::build_cache_key;
use crate::domain::cache::result_cache::ResultCache;
use crate::domain::geometry::transform::{compose_nested, to_pixel_rect};
use crate::domain::geometry::value_objects::{CoordinateSpace, PixelRect};
use crate::domain::history::log::HistoryLog;
use crate::domain::history::model::HistoryEntry;
use crate::domain::logger::Logger;
use crate::domain::search::errors::{ProviderError, SearchError};
use crate::domain::search::label::choose_search_label;
use crate::domain::search::model::{ProductMatch, SearchConfig, SearchResult, SearchType};
use crate::domain::search::reachability::is_network_reachable;
use crate::domain::search::services::{
    FallbackLinkService, ImageSimilaritySearchService, KeywordSearchService,
};
use crate::domain::search::session::{SlotDelivery, SlotRegistry, SlotTicket};
use crate::domain::search::use_cases::search::{SearchObjectParams, SearchProductsUseCase};

const CACHE_PROVIDER_ID: &str = "object_search";

/// The closed set of strategies the orchestrator can run. Dispatch goes
/// through [`run_strategy`](SearchProductsUseCaseImpl::run_strategy) so a
/// new strategy cannot be added without handling it there.
enum SearchStrategy {
    ImageSimilarity { image_ref: String, crop: PixelRect },
    Keyword { query: String },
    StaticFallback { query: String },
}

pub struct SearchProductsUseCaseImpl {
    pub image_search: Arc<dyn ImageSimilaritySearchService>,
    pub keyword_search: Arc<dyn KeywordSearchService>,
    pub fallback_links: Arc<dyn FallbackLinkService>,
    pub cache: Arc<ResultCache>,
    pub history: Arc<dyn HistoryLog>,
    pub slots: Arc<SlotRegistry>,
    pub logger: Arc<dyn Logger>,
    pub config: SearchConfig,
}

impl SearchProductsUseCaseImpl {
    /// Resolves the caller's bounding box into an absolute pixel rect.
    /// Failures degrade: the image tier is skipped, never the request.
    fn resolve_crop(&self, params: &SearchObjectParams) -> Option<PixelRect> {
        let bbox = params.bounding_box.as_ref()?;

        let resolved = match params.coordinate_space {
            CoordinateSpace::Pixels => PixelRect::new(
                bbox.x.round() as u32,
                bbox.y.round() as u32,
                bbox.width.round() as u32,
                bbox.height.round() as u32,
            ),
            CoordinateSpace::Normalized => {
                if let Some(existing) = &params.existing_crop {
                    compose_nested(existing, bbox)
                } else if let Some(dims) = &params.image_dimensions {
                    to_pixel_rect(bbox, dims)
                } else {
                    self.logger
                        .warn("No dimensions available to resolve a normalized crop");
                    return None;
                }
            }
        };

        match resolved {
            Ok(rect) => Some(rect),
            Err(err) => {
                self.logger
                    .warn(&format!("Skipping image tier, crop invalid: {}", err));
                None
            }
        }
    }

    /// The single dispatch point for every strategy, with the per-call
    /// deadline applied uniformly.
    async fn run_strategy(
        &self,
        strategy: &SearchStrategy,
    ) -> Result<Vec<ProductMatch>, ProviderError> {
        let deadline = Duration::from_millis(self.config.provider_timeout_ms);
        let call = async {
            match strategy {
                SearchStrategy::ImageSimilarity { image_ref, crop } => {
                    self.image_search
                        .search_by_image(image_ref, crop, self.config.max_results)
                        .await
                }
                SearchStrategy::Keyword { query } => {
                    self.keyword_search
                        .search_by_keyword(query, self.config.max_results)
                        .await
                }
                SearchStrategy::StaticFallback { query } => Ok(self.fallback_links.links(query)),
            }
        };

        match tokio::time::timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        }
    }

    async fn run_optional(
        &self,
        strategy: Option<SearchStrategy>,
    ) -> Option<Result<Vec<ProductMatch>, ProviderError>> {
        match strategy {
            Some(strategy) => Some(self.run_strategy(&strategy).await),
            None => None,
        }
    }

    async fn record_history(&self, fingerprint: &str, object_count: usize, provider: &str) {
        let entry = HistoryEntry::new(fingerprint, object_count, provider);
        if let Err(err) = self.history.record(entry).await {
            self.logger.warn(&format!("History write failed: {}", err));
        }
    }
}

#[async_trait]
impl SearchProductsUseCase for SearchProductsUseCaseImpl {
    async fn execute(&self, params: SearchObjectParams) -> Result<SearchResult, SearchError> {
        let started = Instant::now();

        let has_image = params
            .image_ref
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        let query = choose_search_label(
            &params.label,
            params.options.best_guess_label.as_deref(),
            &params.options.entities,
            self.config.entity_confidence_threshold,
        );
        if !has_image && query.is_empty() {
            return Err(SearchError::EmptyRequest);
        }

        self.logger
            .info(&format!("Searching products for \"{}\"", query));

        let crop = self.resolve_crop(&params);
        let cache_key = build_cache_key(
            CACHE_PROVIDER_ID,
            (!query.is_empty()).then_some(query.as_str()),
            params.image_ref.as_deref(),
            crop.as_ref(),
        );

        if params.options.force_refresh {
            self.cache.invalidate(&cache_key.fingerprint).await;
        } else if let Some(hit) = self.cache.get(&cache_key.key).await {
            self.logger.debug(&format!("Cache hit: {}", cache_key.key));
            self.record_history(&cache_key.fingerprint, hit.matches.len(), &hit.source)
                .await;
            return Ok(hit);
        }

        let image_strategy = match (&params.image_ref, &crop) {
            (Some(image_ref), Some(rect)) if is_network_reachable(image_ref) => {
                Some(SearchStrategy::ImageSimilarity {
                    image_ref: image_ref.clone(),
                    crop: *rect,
                })
            }
            _ => None,
        };
        let keyword_strategy = (!query.is_empty()).then(|| SearchStrategy::Keyword {
            query: query.clone(),
        });

        // Both tiers run concurrently with independent failure isolation;
        // a timeout or error in one never suppresses the other.
        let (image_outcome, keyword_outcome) = tokio::join!(
            self.run_optional(image_strategy),
            self.run_optional(keyword_strategy)
        );

        let mut matches: Vec<ProductMatch> = Vec::new();
        let mut sources: Vec<&str> = Vec::new();
        for (name, outcome) in [("image", image_outcome), ("keyword", keyword_outcome)] {
            match outcome {
                Some(Ok(tier_matches)) if !tier_matches.is_empty() => {
                    sources.push(name);
                    matches.extend(tier_matches);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    self.logger.warn(&format!("{} tier failed: {}", name, err));
                }
                None => {}
            }
        }

        let result = if !matches.is_empty() {
            let search_type = match sources.as_slice() {
                ["image", "keyword"] => SearchType::Combined,
                ["image"] => SearchType::ImageSimilarity,
                _ => SearchType::Keyword,
            };
            SearchResult {
                matches,
                search_type,
                source: sources.join("+"),
                processing_time_ms: started.elapsed().as_millis() as u64,
                success: true,
                error: None,
            }
        } else {
            let links = self
                .run_strategy(&SearchStrategy::StaticFallback {
                    query: query.clone(),
                })
                .await
                .unwrap_or_default();
            if links.is_empty() {
                self.logger
                    .warn(&format!("All search tiers exhausted for \"{}\"", query));
                SearchResult {
                    matches: Vec::new(),
                    search_type: SearchType::Fallback,
                    source: "fallback".to_string(),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    success: false,
                    error: Some("search.tiers_exhausted".to_string()),
                }
            } else {
                SearchResult {
                    matches: links,
                    search_type: SearchType::Fallback,
                    source: "fallback".to_string(),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    success: true,
                    error: None,
                }
            }
        };

        if result.success {
            self.cache
                .put(&cache_key.key, &result, self.config.cache_ttl_secs)
                .await;
        }
        self.record_history(&cache_key.fingerprint, result.matches.len(), &result.source)
            .await;

        self.logger.info(&format!(
            "Search finished: {} matches from {} in {}ms",
            result.matches.len(),
            result.source,
            result.processing_time_ms
        ));

        Ok(result)
    }

    async fn execute_in_slot(
        &self,
        params: SearchObjectParams,
        ticket: &SlotTicket,
    ) -> Result<SlotDelivery, SearchError> {
        let result = self.execute(params).await?;

        if self.slots.is_current(ticket) {
            Ok(SlotDelivery::Delivered(result))
        } else {
            self.logger.debug(&format!(
                "Withholding superseded result for slot {}",
                ticket.slot()
            ));
            Ok(SlotDelivery::Superseded)
        }
    }
}
