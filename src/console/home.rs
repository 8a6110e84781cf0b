//! Landing page workflows: rotate the embedded survey form and walk the
//! operator through the number pool.
//!
//! `HomeSession` owns the session state and pushes every event through the
//! reducer in `core::action`; this file only executes the effects the
//! reducer hands back. Ordering guarantee: within one chain (outcome post,
//! then replacement fetch) the second call is only issued after the first
//! resolves. Nothing is guaranteed across independent chains.

use std::sync::Arc;

use log::{error, info, warn};

use crate::api::{ApiError, Backend};
use crate::console::view::{PageView, embed_url, tel_href};
use crate::core::action::{Action, Effect, update};
use crate::core::journal::SessionJournal;
use crate::core::state::LandingState;

pub struct HomeSession<V: PageView> {
    backend: Arc<dyn Backend>,
    view: V,
    state: LandingState,
    embed_base_url: String,
    journal: Option<SessionJournal>,
}

impl<V: PageView> HomeSession<V> {
    pub fn new(backend: Arc<dyn Backend>, view: V, embed_base_url: impl Into<String>) -> Self {
        Self {
            backend,
            view,
            state: LandingState::new(),
            embed_base_url: embed_base_url.into(),
            journal: None,
        }
    }

    /// Enables the on-disk call journal for this session.
    pub fn with_journal(mut self) -> Self {
        self.journal = Some(SessionJournal::new());
        self
    }

    /// Read access to the render target, mainly for tests.
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn state(&self) -> &LandingState {
        &self.state
    }

    /// Seeds the session: loads the stored form key, renders the first
    /// embed, and fetches the first number. Returns true when an embed was
    /// rendered, so the caller can deliver its load event.
    pub async fn start(&mut self) -> Result<bool, ApiError> {
        let key = self.backend.fetch_form_key().await?;
        if key.is_none() {
            warn!("No form key stored on the backend; survey embedding disabled");
        }
        update(&mut self.state, Action::FormKeyLoaded(key));

        let mut embedded = false;
        if let Some(form_key) = self.state.form_key.clone() {
            self.view
                .show_embed(&embed_url(&self.embed_base_url, &form_key));
            embedded = true;
        }

        self.next_number().await?;
        Ok(embedded)
    }

    /// Delivers one embed-load event. Even loads replace the embed and
    /// record the current number as answered; odd loads are the fresh embed
    /// reporting in and do nothing.
    ///
    /// Returns true when the load replaced the embed, so the caller can
    /// deliver the fresh embed's own load event.
    pub async fn form_loaded(&mut self) -> Result<bool, ApiError> {
        let effects = update(&mut self.state, Action::FormLoaded);
        let mut embedded = false;
        for effect in effects {
            match effect {
                Effect::EmbedForm { form_key } => {
                    self.view
                        .show_embed(&embed_url(&self.embed_base_url, &form_key));
                    embedded = true;
                }
                Effect::RecordOutcome {
                    phone_number,
                    outcome,
                } => {
                    self.post_outcome(&phone_number, &outcome).await?;
                }
                Effect::FetchNumber => self.next_number().await?,
            }
        }
        Ok(embedded)
    }

    /// Records an outcome for the currently assigned number, then rotates
    /// to a fresh one. Without an assigned number there is nothing to
    /// record and the event is dropped with a warning.
    pub async fn record_outcome(&mut self, outcome: &str) -> Result<(), ApiError> {
        let Some(number) = self.state.phone_number.clone() else {
            warn!("No number assigned, ignoring outcome {outcome:?}");
            return Ok(());
        };
        self.post_outcome(&number, outcome).await
    }

    /// Fetches a replacement number and renders it.
    pub async fn next_number(&mut self) -> Result<(), ApiError> {
        let assignment = match self.backend.fetch_number().await {
            Ok(a) => a,
            Err(e) => {
                error!("Failed to fetch a number: {e}");
                return Err(e);
            }
        };

        update(
            &mut self.state,
            Action::NumberAssigned(assignment.map(|a| a.phone_number)),
        );

        match &self.state.phone_number {
            Some(number) => self.view.show_number(number, &tel_href(number)),
            None => self.view.show_pool_exhausted(),
        }
        Ok(())
    }

    /// Posts one outcome and, only once the backend acks it, executes the
    /// chained replacement fetch.
    async fn post_outcome(&mut self, number: &str, outcome: &str) -> Result<(), ApiError> {
        if let Err(e) = self.backend.record_outcome(number, outcome).await {
            error!("Failed to record {outcome:?} for {number}: {e}");
            return Err(e);
        }
        info!("Recorded {outcome:?} for {number}");

        if let Some(journal) = &mut self.journal {
            journal.record(number, outcome);
        }

        for effect in update(&mut self.state, Action::OutcomeRecorded) {
            if let Effect::FetchNumber = effect {
                self.next_number().await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::SUBMITTED_OUTCOME;
    use crate::test_support::{FakeBackend, RecordingView};

    fn session(backend: FakeBackend) -> HomeSession<RecordingView> {
        HomeSession::new(
            Arc::new(backend),
            RecordingView::new(),
            "https://forms.example.com/embed",
        )
    }

    #[test]
    fn test_start_seeds_embed_and_number() {
        let mut session = session(
            FakeBackend::new()
                .with_form_key("key123")
                .with_numbers(&["555-0100"]),
        );
        let embedded = tokio_test::block_on(session.start()).unwrap();
        assert!(embedded);
        assert_eq!(
            session.view().rendered,
            vec![
                "embed https://forms.example.com/embed?formkey=key123".to_string(),
                "number 555-0100 tel:555-0100?call".to_string(),
            ]
        );
        assert_eq!(session.state().form_key.as_deref(), Some("key123"));
    }

    #[test]
    fn test_start_without_form_key_skips_embed() {
        let mut session = session(FakeBackend::new().with_numbers(&["555-0100"]));
        let embedded = tokio_test::block_on(session.start()).unwrap();
        assert!(!embedded);
        assert_eq!(
            session.view().rendered,
            vec!["number 555-0100 tel:555-0100?call".to_string()]
        );
    }

    #[test]
    fn test_single_load_does_nothing() {
        let mut session = session(
            FakeBackend::new()
                .with_form_key("key123")
                .with_numbers(&["555-0100"]),
        );
        tokio_test::block_on(session.start()).unwrap();
        let rendered_after_start = session.view().rendered.len();

        let embedded = tokio_test::block_on(session.form_loaded()).unwrap();
        assert!(!embedded);
        assert_eq!(session.view().rendered.len(), rendered_after_start);
        assert_eq!(session.state().load_count, 1);
    }

    #[test]
    fn test_second_load_refreshes_and_records_answered() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_form_key("key123")
                .with_numbers(&["555-0100", "555-0101"]),
        );
        let mut session = HomeSession::new(
            backend.clone(),
            RecordingView::new(),
            "https://forms.example.com/embed",
        );
        tokio_test::block_on(session.start()).unwrap();

        tokio_test::block_on(session.form_loaded()).unwrap();
        let embedded = tokio_test::block_on(session.form_loaded()).unwrap();

        assert!(embedded);
        // The outcome was posted for the number assigned at that moment,
        // and the chained fetch rotated to the next one.
        assert!(
            backend
                .calls()
                .contains(&format!("record_outcome 555-0100 {SUBMITTED_OUTCOME}"))
        );
        assert_eq!(session.state().phone_number.as_deref(), Some("555-0101"));
        assert!(
            session
                .view()
                .rendered
                .contains(&"number 555-0101 tel:555-0101?call".to_string())
        );
    }

    #[test]
    fn test_record_outcome_chains_into_one_fetch() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_form_key("key123")
                .with_numbers(&["555-0100", "555-0101"]),
        );
        let mut session = HomeSession::new(
            backend.clone(),
            RecordingView::new(),
            "https://forms.example.com/embed",
        );
        tokio_test::block_on(session.start()).unwrap();
        let fetches_before = count_fetches(&backend.calls());

        tokio_test::block_on(session.record_outcome("no answer")).unwrap();

        assert!(
            backend
                .calls()
                .contains(&"record_outcome 555-0100 no answer".to_string())
        );
        assert_eq!(count_fetches(&backend.calls()), fetches_before + 1);
        assert_eq!(session.state().phone_number.as_deref(), Some("555-0101"));
    }

    #[test]
    fn test_failed_outcome_post_does_not_rotate() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_form_key("key123")
                .with_numbers(&["555-0100", "555-0101"])
                .failing_writes(),
        );
        let mut session = HomeSession::new(
            backend.clone(),
            RecordingView::new(),
            "https://forms.example.com/embed",
        );
        tokio_test::block_on(session.start()).unwrap();
        let fetches_before = count_fetches(&backend.calls());

        let result = tokio_test::block_on(session.record_outcome("busy"));

        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(count_fetches(&backend.calls()), fetches_before);
        assert_eq!(session.state().phone_number.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_exhausted_pool_renders_and_drops_outcomes() {
        let mut session = session(FakeBackend::new().with_form_key("key123"));
        tokio_test::block_on(session.start()).unwrap();
        assert!(
            session
                .view()
                .rendered
                .contains(&"pool exhausted".to_string())
        );

        // With nothing assigned, an outcome event is dropped, not posted.
        tokio_test::block_on(session.record_outcome("answered")).unwrap();
        assert!(session.state().phone_number.is_none());
    }

    fn count_fetches(calls: &[String]) -> usize {
        calls.iter().filter(|c| *c == "fetch_number").count()
    }
}
