use url::Url;

use business::domain::geometry::transform::serialize_crop_param;
use business::domain::geometry::value_objects::PixelRect;
use business::domain::search::errors::ProviderError;
use business::domain::search::services::ImageCropService;

/// Query parameters that conflict with an explicit rect: resize and
/// pixel-ratio hints are meaningless once the rect is set, and a stale
/// `rect` must never survive re-cropping.
const CONFLICTING_PARAMS: &[&str] = &["rect", "w", "h", "dpr", "fit", "ar", "crop"];

/// Builds a cropped image reference by rewriting the URL's crop
/// parameters, for image CDNs that accept an `x,y,w,h` rect plus an
/// output-width cap.
pub struct UrlCropBuilder;

impl ImageCropService for UrlCropBuilder {
    fn cropped_ref(
        &self,
        image_ref: &str,
        rect: &PixelRect,
        max_output_width: u32,
    ) -> Result<String, ProviderError> {
        let mut url =
            Url::parse(image_ref.trim()).map_err(|_| ProviderError::UnreachableReference)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::UnreachableReference);
        }

        let params = serialize_crop_param(rect, max_output_width);

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !CONFLICTING_PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &retained {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("rect", &params.rect_param());
            pairs.append_pair("w", &params.output_width.to_string());
        }

        Ok(url.to_string())
    }
}
