//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, Backend, NumberAssignment};
use crate::console::view::{AdminSnapshot, PageView};

/// An in-memory backend that logs every call it receives.
///
/// Writes can be made to fail wholesale with [`FakeBackend::failing_writes`];
/// reads always succeed. Numbers are handed out front-to-back.
pub struct FakeBackend {
    log: Mutex<Vec<String>>,
    numbers: Mutex<Vec<String>>,
    form_key: Option<String>,
    fail_writes: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            numbers: Mutex::new(Vec::new()),
            form_key: None,
            fail_writes: false,
        }
    }

    pub fn with_form_key(mut self, key: &str) -> Self {
        self.form_key = Some(key.to_string());
        self
    }

    pub fn with_numbers(mut self, numbers: &[&str]) -> Self {
        self.numbers = Mutex::new(numbers.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Everything the backend was asked to do, in order.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn write(&self, entry: String) -> Result<(), ApiError> {
        self.log.lock().unwrap().push(entry);
        if self.fail_writes {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn set_form_key(&self, key: &str) -> Result<(), ApiError> {
        self.write(format!("set_form_key {key}"))
    }

    async fn add_user(&self, email: &str) -> Result<(), ApiError> {
        self.write(format!("add_user {email}"))
    }

    async fn delete_user(&self, email: &str) -> Result<(), ApiError> {
        self.write(format!("delete_user {email}"))
    }

    async fn record_outcome(&self, number: &str, outcome: &str) -> Result<(), ApiError> {
        self.write(format!("record_outcome {number} {outcome}"))
    }

    async fn fetch_number(&self) -> Result<Option<NumberAssignment>, ApiError> {
        self.log.lock().unwrap().push("fetch_number".to_string());
        let mut numbers = self.numbers.lock().unwrap();
        if numbers.is_empty() {
            return Ok(None);
        }
        Ok(Some(NumberAssignment {
            phone_number: numbers.remove(0),
        }))
    }

    async fn fetch_form_key(&self) -> Result<Option<String>, ApiError> {
        self.log.lock().unwrap().push("fetch_form_key".to_string());
        Ok(self.form_key.clone())
    }

    async fn upload_numbers(&self, csv: &str) -> Result<(), ApiError> {
        self.write(format!("upload_numbers {} bytes", csv.len()))
    }
}

/// A render target that remembers everything it was asked to draw.
pub struct RecordingView {
    pub rendered: Vec<String>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self {
            rendered: Vec::new(),
        }
    }
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

impl PageView for RecordingView {
    fn show_number(&mut self, number: &str, href: &str) {
        self.rendered.push(format!("number {number} {href}"));
    }

    fn show_embed(&mut self, url: &str) {
        self.rendered.push(format!("embed {url}"));
    }

    fn show_pool_exhausted(&mut self) {
        self.rendered.push("pool exhausted".to_string());
    }

    fn show_admin(&mut self, snapshot: &AdminSnapshot) {
        self.rendered.push(format!(
            "admin form_key={}",
            snapshot.form_key.as_deref().unwrap_or("none")
        ));
    }
}
