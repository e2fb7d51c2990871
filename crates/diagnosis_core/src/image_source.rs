//! Reference-image source normalization
//!
//! The backend may send the explanation image as raw base64, as a `data:`
//! URI, or as an http(s) URL. [`resolve`] turns any of them into something an
//! `<img src>` accepts.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Shown when the backend sent no reference image
pub const NO_IMAGE_PLACEHOLDER: &str =
    "https://placehold.co/600x400/green/white?text=No+Reference+Image";

/// Shown when the payload is not decodable image data
pub const INVALID_IMAGE_PLACEHOLDER: &str =
    "https://placehold.co/600x400/green/white?text=Invalid+Image+Data";

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Standard alphabet, padding optional, lenient about trailing bits
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Resolve an explanation-image field into a displayable URI
pub fn resolve(image: Option<&str>) -> String {
    let Some(image) = image.map(str::trim).filter(|s| !s.is_empty()) else {
        return NO_IMAGE_PLACEHOLDER.to_string();
    };

    if image.starts_with("data:") || image.starts_with("http") {
        return image.to_string();
    }

    // Whitespace inside the payload is not significant
    let payload = strip_whitespace(image);
    match LENIENT.decode(&payload) {
        Ok(_) => format!("{JPEG_DATA_URI_PREFIX}{payload}"),
        Err(err) => {
            tracing::debug!(%err, "reference image is not base64");
            INVALID_IMAGE_PLACEHOLDER.to_string()
        }
    }
}

/// Decode the payload of a base64 `data:` URI
///
/// Returns `None` for URLs, non-base64 data URIs and undecodable payloads.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = LENIENT.decode(strip_whitespace(payload)).ok()?;
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    Some((mime.to_string(), bytes))
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_base64_gets_jpeg_prefix() {
        assert_eq!(resolve(Some("abc123")), "data:image/jpeg;base64,abc123");
    }

    #[test]
    fn test_urls_pass_through() {
        assert_eq!(resolve(Some("http://x/y.png")), "http://x/y.png");
        assert_eq!(
            resolve(Some("https://cdn.example.org/leaf.jpg")),
            "https://cdn.example.org/leaf.jpg"
        );
    }

    #[test]
    fn test_data_uri_passes_through() {
        assert_eq!(
            resolve(Some("data:image/png;base64,abc")),
            "data:image/png;base64,abc"
        );
    }

    #[test]
    fn test_absent_image_gets_placeholder() {
        assert_eq!(resolve(None), NO_IMAGE_PLACEHOLDER);
        assert_eq!(resolve(Some("")), NO_IMAGE_PLACEHOLDER);
    }

    #[test]
    fn test_garbage_gets_invalid_placeholder() {
        assert_eq!(resolve(Some("not base64 at all!")), INVALID_IMAGE_PLACEHOLDER);
    }

    #[test]
    fn test_decode_data_uri() {
        let (mime, bytes) = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hello");

        assert!(decode_data_uri("http://x/y.png").is_none());
        assert!(decode_data_uri("data:text/plain,hello").is_none());
    }

    #[test]
    fn test_line_wrapped_base64_is_accepted() {
        assert_eq!(
            resolve(Some("aGVs\nbG8=")),
            "data:image/jpeg;base64,aGVsbG8="
        );
        assert_eq!(
            resolve(Some(" aGVs\r\n bG8= ")),
            "data:image/jpeg;base64,aGVsbG8="
        );

        let (_, bytes) = decode_data_uri("data:image/jpeg;base64,aGVs\nbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }
}
