//! Admin page workflows: manage the survey form key and the caller
//! whitelist.
//!
//! Every mutation posts once and, only after the backend acks, refreshes
//! the admin snapshot. A failed post leaves the page untouched; the error
//! is logged and handed back to the caller.

use std::sync::Arc;

use log::error;

use crate::api::{ApiError, Backend};
use crate::console::view::{AdminSnapshot, PageView};

pub struct AdminPanel<V: PageView> {
    backend: Arc<dyn Backend>,
    view: V,
}

impl<V: PageView> AdminPanel<V> {
    pub fn new(backend: Arc<dyn Backend>, view: V) -> Self {
        Self { backend, view }
    }

    /// Read access to the render target, mainly for tests.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Replaces the survey form key and refreshes the page.
    pub async fn set_form_key(&mut self, key: &str) -> Result<(), ApiError> {
        let result = self.backend.set_form_key(key).await;
        self.after_write("set the form key", result).await
    }

    /// Adds an email to the caller whitelist and refreshes the page.
    pub async fn add_user(&mut self, email: &str) -> Result<(), ApiError> {
        let result = self.backend.add_user(email).await;
        self.after_write("whitelist the user", result).await
    }

    /// Removes an email from the caller whitelist and refreshes the page.
    pub async fn delete_user(&mut self, email: &str) -> Result<(), ApiError> {
        let result = self.backend.delete_user(email).await;
        self.after_write("remove the user", result).await
    }

    /// Bulk-loads recipient numbers and refreshes the page.
    pub async fn upload_numbers(&mut self, csv: &str) -> Result<(), ApiError> {
        let result = self.backend.upload_numbers(csv).await;
        self.after_write("upload the numbers", result).await
    }

    /// The full-page-reload analog: re-fetch what the admin page displays
    /// and redraw it.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let form_key = match self.backend.fetch_form_key().await {
            Ok(key) => key,
            Err(e) => {
                error!("Failed to refresh the admin page: {e}");
                return Err(e);
            }
        };
        self.view.show_admin(&AdminSnapshot { form_key });
        Ok(())
    }

    /// Refreshes after a successful write; a failure skips the refresh.
    async fn after_write(
        &mut self,
        what: &str,
        result: Result<(), ApiError>,
    ) -> Result<(), ApiError> {
        match result {
            Ok(()) => self.refresh().await,
            Err(e) => {
                error!("Failed to {what}: {e}");
                Err(e)
            }
        }
    }
}
