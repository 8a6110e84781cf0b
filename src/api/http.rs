//! HTTP implementation of the poll backend client.
//!
//! Endpoint paths and field names match the backend's RPC handlers:
//! - `POST formmethod` with `form_key`, `GET formmethod` for the stored key
//! - `POST usermethod` with `add_email` or `delete_email`
//! - `GET phonenumbers` for the next number, `POST phonenumbers` to record
//!   an outcome (`phone_number`, `contact_response`)
//! - `POST admin` with `phone-number-csv` to bulk-load recipients

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Response;

use super::backend::{ApiError, Backend};
use super::types::NumberAssignment;

/// In-band marker the backend sends on `GET phonenumbers` once every
/// recipient has been contacted.
const POOL_EXHAUSTED: &str = "no number";

/// Talks to the poll backend over HTTP with URL-encoded form posts.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Sends one form post and checks the status. Write acks carry no
    /// payload worth inspecting.
    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .form(fields)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(path, response).await.map(|_| ())
    }

    async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

/// Converts a non-success response into `ApiError::Api`.
async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        debug!("{} responded {}", path, response.status());
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("{path} failed: HTTP {status} - {message}");
    Err(ApiError::Api { status, message })
}

async fn read_body(path: &str, response: Response) -> Result<String, ApiError> {
    check_status(path, response)
        .await?
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn set_form_key(&self, key: &str) -> Result<(), ApiError> {
        info!("Setting form key");
        self.post_form("formmethod", &[("form_key", key)]).await
    }

    async fn add_user(&self, email: &str) -> Result<(), ApiError> {
        info!("Whitelisting {email}");
        self.post_form("usermethod", &[("add_email", email)]).await
    }

    async fn delete_user(&self, email: &str) -> Result<(), ApiError> {
        info!("Removing {email} from the whitelist");
        self.post_form("usermethod", &[("delete_email", email)])
            .await
    }

    async fn record_outcome(&self, number: &str, outcome: &str) -> Result<(), ApiError> {
        info!("Marking {number} as {outcome:?}");
        self.post_form(
            "phonenumbers",
            &[("phone_number", number), ("contact_response", outcome)],
        )
        .await
    }

    async fn fetch_number(&self) -> Result<Option<NumberAssignment>, ApiError> {
        let response = self.get("phonenumbers").await?;
        let body = read_body("phonenumbers", response).await?;

        // An exhausted pool is reported in-band rather than by status code,
        // either as a bare marker or a JSON-encoded string.
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed.trim_matches('"') == POOL_EXHAUSTED {
            info!("Number pool exhausted");
            return Ok(None);
        }

        let assignment: NumberAssignment =
            serde_json::from_str(trimmed).map_err(|e| ApiError::Parse(e.to_string()))?;
        debug!("Assigned number {}", assignment.phone_number);
        Ok(Some(assignment))
    }

    async fn fetch_form_key(&self) -> Result<Option<String>, ApiError> {
        let response = self.get("formmethod").await?;

        // The backend answers 400 when no key has been stored yet.
        if response.status().as_u16() == 400 {
            debug!("No form key stored");
            return Ok(None);
        }

        let body = read_body("formmethod", response).await?;
        let key = body.trim();
        if key.is_empty() {
            Ok(None)
        } else {
            Ok(Some(key.to_string()))
        }
    }

    async fn upload_numbers(&self, csv: &str) -> Result<(), ApiError> {
        info!("Uploading recipient numbers ({} bytes)", csv.len());
        self.post_form("admin", &[("phone-number-csv", csv)]).await
    }
}
