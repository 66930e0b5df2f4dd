//! Errors raised while talking to the upstream task API.

use thiserror::Error;

/// Message used when the upstream gave us nothing better to show.
pub const GENERIC_UPSTREAM_MESSAGE: &str = "An error occurred";

/// Failure of a submission or status call. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status. `message` is the body's `status_message` if it had one.
    #[error("Upstream returned {status}: {}", message.as_deref().unwrap_or(GENERIC_UPSTREAM_MESSAGE))]
    Status { status: u16, message: Option<String> },

    /// HTTP succeeded but the task entry itself carries an error code.
    #[error("Task rejected ({code}): {message}")]
    Task { code: u64, message: String },

    /// Body did not have the shape we expect (missing task id, not JSON, ...).
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl UpstreamError {
    /// Message relayed to the caller in the `{error: ...}` body.
    pub fn user_message(&self) -> String {
        match self {
            UpstreamError::Network(msg) => msg.clone(),
            UpstreamError::Status { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string()),
            UpstreamError::Task { message, .. } if !message.is_empty() => message.clone(),
            UpstreamError::Task { .. } | UpstreamError::UnexpectedResponse(_) => {
                GENERIC_UPSTREAM_MESSAGE.to_string()
            }
        }
    }

    /// Build a status error from a raw response body, pulling out `status_message`.
    pub fn from_status_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("status_message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty());
        UpstreamError::Status { status, message }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            UpstreamError::Network(format!("Connection failed: {}", e))
        } else {
            UpstreamError::Network(format!("Request failed: {}", e))
        }
    }
}
