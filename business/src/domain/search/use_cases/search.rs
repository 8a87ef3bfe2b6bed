use async_trait::async_trait;

use crate::domain::geometry::value_objects::{
    BoundingBox, CoordinateSpace, ImageDimensions, PixelRect,
};

use super::super::errors::SearchError;
use super::super::model::{SearchOptions, SearchResult};
use super::super::session::{SlotDelivery, SlotTicket};

/// One marked object to find products for. At least one of the label and
/// the image reference must be present.
pub struct SearchObjectParams {
    /// The object's detection label; doubles as the keyword query.
    pub label: String,
    pub bounding_box: Option<BoundingBox>,
    /// The space `bounding_box` is expressed in, stated by the caller.
    pub coordinate_space: CoordinateSpace,
    pub image_ref: Option<String>,
    pub image_dimensions: Option<ImageDimensions>,
    /// The region the image reference already represents, when it encodes
    /// an earlier crop; the bounding box is then relative to this rect.
    pub existing_crop: Option<PixelRect>,
    pub options: SearchOptions,
}

#[async_trait]
pub trait SearchProductsUseCase: Send + Sync {
    async fn execute(&self, params: SearchObjectParams) -> Result<SearchResult, SearchError>;

    /// As [`execute`](SearchProductsUseCase::execute), but withholds the
    /// result when `ticket` was superseded while the search ran. Cache
    /// and history are still populated for future reuse.
    async fn execute_in_slot(
        &self,
        params: SearchObjectParams,
        ticket: &SlotTicket,
    ) -> Result<SlotDelivery, SearchError>;
}
