//! Recognition-service abstraction layer for recibo.
//!
//! This crate provides a unified interface to the external
//! document-understanding service that performs OCR and field extraction
//! on receipt images. The service is reached over HTTP with an
//! enqueue -> poll -> fetch-result job protocol; callers only see a raw
//! JSON response tree or a terminal failure.

mod error;
mod http;
mod payload;

pub use error::RecognitionError;
pub use http::{HttpRecognitionClient, RecognitionSettings};
pub use payload::{DEFAULT_MIN_IMAGE_BASE64_LEN, decode_image_payload};

use serde_json::Value;

/// Result type for recognition operations.
pub type Result<T> = std::result::Result<T, RecognitionError>;

/// Trait for recognition-service backends.
///
/// A backend submits one receipt image and blocks until the service
/// produces its final response tree or a terminal failure. Any polling or
/// retrying happens inside the backend; callers never retry a recognition
/// call themselves.
pub trait RecognitionBackend: Send + Sync {
    /// Run recognition on one image.
    ///
    /// # Arguments
    /// * `image` - Raw image bytes (JPEG/PNG as captured)
    ///
    /// # Returns
    /// The service's raw JSON response tree, shape unspecified
    fn recognize(&self, image: &[u8]) -> Result<Value>;
}
