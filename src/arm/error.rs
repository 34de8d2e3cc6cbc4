use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub type ArmResult<T> = Result<T, ArmError>;

#[derive(Debug, Error)]
pub enum ArmError {
    #[error("Request {method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        source: reqwest::Error,
    },
    #[error("Request {method} {url} returned {status}: {code}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        code: String,
        message: String,
    },
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
    #[error("Operation on {resource} finished as {state}: {message}")]
    OperationFailed {
        resource: String,
        state: String,
        message: String,
    },
    #[error("Operation on {resource} did not finish within {}s", .waited.as_secs())]
    PollTimeout { resource: String, waited: Duration },
}

/// Resource Manager error envelope: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ArmError {
    /// Builds a status error from a non-success body, falling back to the raw
    /// text when the body is not an ARM error envelope.
    pub(crate) fn status(method: &str, url: &str, status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .unwrap_or_default();

        let (code, message) = if detail.code.is_empty() && detail.message.is_empty() {
            ("Unknown".to_string(), body.trim().to_string())
        } else {
            (detail.code, detail.message)
        };

        Self::Status {
            method: method.to_string(),
            url: url.to_string(),
            status,
            code,
            message,
        }
    }
}
