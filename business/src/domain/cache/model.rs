use sha2::{Digest, Sha256};

use crate::domain::geometry::value_objects::PixelRect;

/// Image references can be multi-megabyte data URLs; only this much of
/// the reference feeds the fingerprint.
const IMAGE_REF_SAMPLE_LEN: usize = 512;

const FINGERPRINT_LEN: usize = 16;

/// A cache key plus the input fingerprint it embeds. The fingerprint
/// identifies the request input across providers; the key scopes it to
/// one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub key: String,
    pub fingerprint: String,
}

/// Hashes the discriminating parts of a search request: the query text,
/// a bounded sample of the image reference, and the crop rect. Never the
/// full payload.
pub fn request_fingerprint(
    query: Option<&str>,
    image_ref: Option<&str>,
    crop: Option<&PixelRect>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.unwrap_or("").as_bytes());
    hasher.update(b"|");
    let sample: String = image_ref
        .unwrap_or("")
        .chars()
        .take(IMAGE_REF_SAMPLE_LEN)
        .collect();
    hasher.update(sample.as_bytes());
    hasher.update(b"|");
    if let Some(rect) = crop {
        hasher.update(format!("{},{},{},{}", rect.x, rect.y, rect.width, rect.height).as_bytes());
    }

    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}

/// Builds the storage key for one provider's view of a request.
pub fn build_cache_key(
    provider: &str,
    query: Option<&str>,
    image_ref: Option<&str>,
    crop: Option<&PixelRect>,
) -> CacheKey {
    let fingerprint = request_fingerprint(query, image_ref, crop);
    CacheKey {
        key: format!("{}:{}", provider, fingerprint),
        fingerprint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> PixelRect {
        PixelRect::new(10, 20, 100, 200).unwrap()
    }

    #[test]
    fn should_produce_a_stable_fingerprint() {
        let a = request_fingerprint(Some("coffee machine"), Some("https://x/img.jpg"), Some(&rect()));
        let b = request_fingerprint(Some("coffee machine"), Some("https://x/img.jpg"), Some(&rect()));
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn should_discriminate_by_query_text() {
        let a = request_fingerprint(Some("coffee machine"), None, None);
        let b = request_fingerprint(Some("espresso maker"), None, None);
        assert_ne!(a, b);
    }

    #[test]
    fn should_discriminate_by_crop_rect() {
        let other = PixelRect::new(10, 20, 100, 201).unwrap();
        let a = request_fingerprint(None, Some("https://x/img.jpg"), Some(&rect()));
        let b = request_fingerprint(None, Some("https://x/img.jpg"), Some(&other));
        assert_ne!(a, b);
    }

    #[test]
    fn should_sample_only_the_head_of_a_long_reference() {
        let head = "data:image/jpeg;base64,".to_string() + &"a".repeat(600);
        let a = request_fingerprint(None, Some(&(head.clone() + "111")), None);
        let b = request_fingerprint(None, Some(&(head + "222")), None);
        // Intentional: speed over exactness for giant payloads.
        assert_eq!(a, b);
    }

    #[test]
    fn should_scope_the_key_to_the_provider() {
        let a = build_cache_key("object_search", Some("lamp"), None, None);
        let b = build_cache_key("detection", Some("lamp"), None, None);
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_ne!(a.key, b.key);
        assert!(a.key.starts_with("object_search:"));
    }
}
