use std::fmt;

use async_trait::async_trait;

use super::types::NumberAssignment;

/// Errors that can occur while talking to the poll backend.
/// Variants carry enough info to determine retryability (future use).
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// Backend returned an error response. Retryable if status >= 500.
    Api { status: u16, message: String },
    /// Failed to parse the backend's response body. Not retryable.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The poll backend's RPC surface.
///
/// Writes are fire-and-wait-for-ack: a success status is the whole result,
/// response bodies of writes are never inspected.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Replaces the survey form key stored on the backend.
    async fn set_form_key(&self, key: &str) -> Result<(), ApiError>;

    /// Adds an email address to the caller whitelist.
    async fn add_user(&self, email: &str) -> Result<(), ApiError>;

    /// Removes an email address from the caller whitelist.
    async fn delete_user(&self, email: &str) -> Result<(), ApiError>;

    /// Records how a call to `number` was received. Outcome labels are an
    /// open set; the backend stores whatever string it is given.
    async fn record_outcome(&self, number: &str, outcome: &str) -> Result<(), ApiError>;

    /// Fetches the next uncalled number. `None` means every recipient has
    /// been contacted.
    async fn fetch_number(&self) -> Result<Option<NumberAssignment>, ApiError>;

    /// Fetches the currently stored form key, if any.
    async fn fetch_form_key(&self) -> Result<Option<String>, ApiError>;

    /// Bulk-loads recipient numbers from a one-column CSV.
    async fn upload_numbers(&self, csv: &str) -> Result<(), ApiError>;
}
