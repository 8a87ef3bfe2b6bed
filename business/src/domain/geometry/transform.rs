use super::errors::GeometryError;
use super::value_objects::{BoundingBox, ImageDimensions, PixelRect};

/// Crop request parameters ready for an image-serving provider: the
/// absolute rect plus a capped output width. Any resize or pixel-ratio
/// hints a reference URL carries are meaningless once an explicit rect
/// is set and must be stripped by the provider adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropParams {
    pub rect: PixelRect,
    pub output_width: u32,
}

impl CropParams {
    /// The rect as the `x,y,w,h` parameter value providers expect.
    pub fn rect_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.rect.x, self.rect.y, self.rect.width, self.rect.height
        )
    }
}

/// Converts a normalized bounding box into an absolute pixel rect over
/// the given image dimensions, rounding to the nearest pixel and clamping
/// so the rect stays inside the image.
pub fn to_pixel_rect(
    bbox: &BoundingBox,
    dims: &ImageDimensions,
) -> Result<PixelRect, GeometryError> {
    if dims.width == 0 || dims.height == 0 {
        return Err(GeometryError::InvalidDimensions);
    }
    bbox.validate()?;

    let (x, width) = project_side(bbox.x, bbox.width, dims.width);
    let (y, height) = project_side(bbox.y, bbox.height, dims.height);

    PixelRect::new(x, y, width, height)
}

/// Composes a bounding box expressed relative to an existing crop into an
/// absolute pixel rect. Must be used whenever the image reference already
/// encodes a crop; transforming against the original dimensions instead
/// silently produces a wrong region.
pub fn compose_nested(
    existing: &PixelRect,
    bbox: &BoundingBox,
) -> Result<PixelRect, GeometryError> {
    bbox.validate()?;

    let (rel_x, width) = project_side(bbox.x, bbox.width, existing.width);
    let (rel_y, height) = project_side(bbox.y, bbox.height, existing.height);

    PixelRect::new(existing.x + rel_x, existing.y + rel_y, width, height)
}

/// Builds the crop descriptor for a resolved rect. The output width is
/// capped so the provider never upscales past the rect itself.
pub fn serialize_crop_param(rect: &PixelRect, max_output_width: u32) -> CropParams {
    CropParams {
        rect: *rect,
        output_width: rect.width.min(max_output_width),
    }
}

/// Projects one normalized axis onto a pixel extent. The origin is clamped
/// to the last pixel and the length to the remaining span, so a valid box
/// can never round itself outside the image.
fn project_side(origin: f64, length: f64, extent: u32) -> (u32, u32) {
    let extent_f = f64::from(extent);
    let start = ((origin * extent_f).round() as u32).min(extent.saturating_sub(1));
    let span = ((length * extent_f).round() as u32).min(extent - start);
    (start, span)
}
