//! Blocking HTTP client for the hosted recognition service.
//!
//! The service uses an asynchronous job protocol: submitting an image
//! returns a polling URL in the `Operation-Location` header, and the job is
//! polled with a fixed attempt count and a fixed delay until it reports
//! `succeeded` or `failed`. Exhausting the attempts is a distinct timeout
//! outcome.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::{RecognitionBackend, RecognitionError, Result};

const ENV_API_KEY: &str = "RECOGNITION_API_KEY";
const ENV_ENDPOINT: &str = "RECOGNITION_ENDPOINT";
const ENV_MODEL_ID: &str = "RECOGNITION_MODEL_ID";

/// Connection settings for the recognition service.
#[derive(Debug, Clone)]
pub struct RecognitionSettings {
    /// Base URL of the service.
    pub endpoint: String,

    /// API key sent on every request.
    pub api_key: String,

    /// Model identifier selecting the extraction schema.
    pub model_id: String,

    /// Maximum poll attempts before giving up.
    pub poll_attempts: u32,

    /// Delay between poll attempts.
    pub poll_interval: Duration,

    /// Socket-level timeout for each request.
    pub request_timeout: Duration,
}

impl RecognitionSettings {
    /// Create settings with the default polling budget.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model_id: model_id.into(),
            poll_attempts: 30,
            poll_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Read settings from the environment (a local `.env` file is honored).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let endpoint = std::env::var(ENV_ENDPOINT)
            .map_err(|_| RecognitionError::Config(format!("{ENV_ENDPOINT} not set")))?;
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| RecognitionError::Config(format!("{ENV_API_KEY} not set")))?;
        let model_id = std::env::var(ENV_MODEL_ID)
            .map_err(|_| RecognitionError::Config(format!("{ENV_MODEL_ID} not set")))?;

        Ok(Self::new(endpoint, api_key, model_id))
    }

    /// Set the polling budget.
    pub fn with_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval = interval;
        self
    }
}

/// Blocking client implementing the enqueue/poll job protocol.
pub struct HttpRecognitionClient {
    settings: RecognitionSettings,
    client: Client,
}

impl HttpRecognitionClient {
    pub fn new(settings: RecognitionSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| RecognitionError::Transport(e.to_string()))?;

        Ok(Self { settings, client })
    }

    /// Build a client from environment settings.
    pub fn from_env() -> Result<Self> {
        Self::new(RecognitionSettings::from_env()?)
    }

    fn enqueue(&self, image: &[u8]) -> Result<String> {
        let endpoint = self.settings.endpoint.trim_end_matches('/');
        let url = format!(
            "{}/documents/analyze?model={}",
            endpoint, self.settings.model_id
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.settings.api_key))
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .map_err(|e| RecognitionError::Transport(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(RecognitionError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or(RecognitionError::MissingJobLocation)
    }

    fn poll(&self, job_url: &str) -> Result<Value> {
        for attempt in 1..=self.settings.poll_attempts {
            std::thread::sleep(self.settings.poll_interval);

            let response = self
                .client
                .get(job_url)
                .header("Authorization", format!("Token {}", self.settings.api_key))
                .send()
                .map_err(|e| RecognitionError::Transport(transport_message(&e)))?;

            let body: Value = response
                .json()
                .map_err(|e| RecognitionError::InvalidJson(e.to_string()))?;

            match job_status(&body) {
                JobStatus::Succeeded => {
                    debug!("recognition job finished after {} poll(s)", attempt);
                    return Ok(body);
                }
                JobStatus::Failed => return Err(RecognitionError::JobFailed(job_error(&body))),
                JobStatus::Pending => {
                    debug!("job still processing (attempt {})", attempt);
                }
            }
        }

        Err(RecognitionError::Timeout)
    }
}

impl RecognitionBackend for HttpRecognitionClient {
    fn recognize(&self, image: &[u8]) -> Result<Value> {
        let job_url = self.enqueue(image)?;
        debug!("enqueued recognition job at {}", job_url);
        self.poll(&job_url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Interpret the `status` field of a poll body. Unknown states count as
/// still-pending so the loop keeps polling until its budget runs out.
fn job_status(body: &Value) -> JobStatus {
    match body.get("status").and_then(|s| s.as_str()).unwrap_or("") {
        "succeeded" | "completed" | "done" => JobStatus::Succeeded,
        "failed" | "error" => JobStatus::Failed,
        _ => JobStatus::Pending,
    }
}

fn job_error(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .unwrap_or("unknown error")
        .to_string()
}

fn transport_message(e: &reqwest::Error) -> String {
    if e.is_connect() || e.is_timeout() {
        "check your network connection and try again".to_string()
    } else {
        e.to_string()
    }
}
