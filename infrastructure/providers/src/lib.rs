pub mod client;
pub mod crop_url;
pub mod lens_search;
pub mod merchant_links;
pub mod shopping_search;
pub mod vision_detect;

use business::domain::search::errors::ProviderError;

/// Maps a transport-level reqwest failure to the typed provider error.
pub(crate) fn map_request_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network
    }
}
