//! Error types for the recibo-core library.

use thiserror::Error;

/// Main error type for the recibo library.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// Recognition-service error from the backend layer.
    #[error("recognition error: {0}")]
    Recognition(#[from] recibo_recognition::RecognitionError),

    /// The recognition response root is not a JSON object at all.
    ///
    /// Field-level misses never produce this; it marks a payload the
    /// normalizer cannot even start on.
    #[error("unusable recognition payload: {0}")]
    UnusablePayload(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;
