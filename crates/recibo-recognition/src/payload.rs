//! Request payload validation.
//!
//! The browser front end submits receipts as a base64 string. Validation
//! happens here, before any recognition call: payloads too short to be a
//! real photo are rejected outright, and data-URL prefixes from canvas
//! captures are tolerated.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{RecognitionError, Result};

/// Minimum accepted base64 payload length. Anything shorter cannot encode
/// a real receipt photo.
pub const DEFAULT_MIN_IMAGE_BASE64_LEN: usize = 100;

/// Validate and decode a base64 image payload into raw bytes.
pub fn decode_image_payload(image_base64: &str, min_len: usize) -> Result<Vec<u8>> {
    let trimmed = image_base64.trim();
    if trimmed.len() < min_len {
        return Err(RecognitionError::Payload(format!(
            "image payload too short ({} chars, minimum {})",
            trimmed.len(),
            min_len
        )));
    }

    // Tolerate "data:image/jpeg;base64," prefixes and embedded line breaks.
    let data = trimmed
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(',').map(|(_, b)| b))
        .unwrap_or(trimmed);
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| RecognitionError::Payload(format!("invalid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> String {
        STANDARD.encode(vec![0u8; 90])
    }

    #[test]
    fn test_rejects_short_payload() {
        let err = decode_image_payload("abcd", DEFAULT_MIN_IMAGE_BASE64_LEN).unwrap_err();
        assert!(matches!(err, RecognitionError::Payload(_)));
    }

    #[test]
    fn test_decodes_plain_base64() {
        let payload = sample_payload();
        let bytes = decode_image_payload(&payload, DEFAULT_MIN_IMAGE_BASE64_LEN).unwrap();
        assert_eq!(bytes.len(), 90);
    }

    #[test]
    fn test_strips_data_url_prefix() {
        let payload = format!("data:image/jpeg;base64,{}", sample_payload());
        let bytes = decode_image_payload(&payload, DEFAULT_MIN_IMAGE_BASE64_LEN).unwrap();
        assert_eq!(bytes.len(), 90);
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let payload = "!".repeat(200);
        let err = decode_image_payload(&payload, DEFAULT_MIN_IMAGE_BASE64_LEN).unwrap_err();
        assert!(matches!(err, RecognitionError::Payload(_)));
    }
}
