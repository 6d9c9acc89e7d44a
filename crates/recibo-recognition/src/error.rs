//! Error types for the recognition layer.

use thiserror::Error;

/// Errors that can occur while talking to the recognition service.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The image payload failed validation before any service call.
    #[error("invalid image payload: {0}")]
    Payload(String),

    /// The service rejected the request with a non-success status.
    #[error("recognition request failed ({status}): {message}")]
    Http { status: u16, message: String },

    /// Transport-level failure (connect, TLS, socket timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service returned a body that is not valid JSON.
    #[error("service returned invalid JSON: {0}")]
    InvalidJson(String),

    /// The enqueue response carried no job polling location.
    #[error("no job polling location in enqueue response")]
    MissingJobLocation,

    /// The processing job reported terminal failure.
    #[error("recognition job failed: {0}")]
    JobFailed(String),

    /// The job did not finish within the polling budget.
    #[error("timed out waiting for processing")]
    Timeout,

    /// Missing or unusable client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
