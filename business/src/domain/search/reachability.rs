use url::Url;

/// Whether an image reference can be fetched by an external provider.
/// Only absolute http/https URLs qualify; data URLs, local files, blob
/// handles and relative paths cannot be seen by a remote backend.
pub fn is_network_reachable(image_ref: &str) -> bool {
    match Url::parse(image_ref.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_http_and_https_urls() {
        assert!(is_network_reachable("https://cdn.example.com/photo.jpg"));
        assert!(is_network_reachable("http://cdn.example.com/photo.jpg"));
    }

    #[test]
    fn should_reject_data_urls() {
        assert!(!is_network_reachable("data:image/jpeg;base64,/9j/4AAQ"));
    }

    #[test]
    fn should_reject_local_references() {
        assert!(!is_network_reachable("file:///tmp/upload.jpg"));
        assert!(!is_network_reachable("blob:550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_network_reachable("/uploads/photo.jpg"));
        assert!(!is_network_reachable(""));
    }
}
