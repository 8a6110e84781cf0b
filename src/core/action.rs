//! # Actions
//!
//! Everything that can happen on the landing page becomes an `Action`.
//! The embedded form finishes loading? That's `Action::FormLoaded`.
//! The backend acks an outcome post? That's `Action::OutcomeRecorded`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the effects the caller must execute. No side
//! effects here. I/O happens in the console layer.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! This makes the even/odd load gate testable without a backend in sight.

use log::warn;

use crate::core::state::LandingState;

/// Outcome label recorded automatically when a submitted survey refreshes
/// the embed.
pub const SUBMITTED_OUTCOME: &str = "answered";

/// An event fed into the landing-session reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The embedded form finished loading. Fires both when a respondent
    /// submits the survey and when a freshly embedded form comes up.
    FormLoaded,
    /// The backend acked an outcome post.
    OutcomeRecorded,
    /// A number fetch completed. `None` means the pool is exhausted.
    NumberAssigned(Option<String>),
    /// A form key fetch completed.
    FormKeyLoaded(Option<String>),
}

/// I/O the console layer must perform after an `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the embedded survey form with a fresh one for `form_key`.
    EmbedForm { form_key: String },
    /// Post `outcome` for `phone_number`, then feed back `OutcomeRecorded`.
    RecordOutcome {
        phone_number: String,
        outcome: String,
    },
    /// Fetch a replacement number, then feed back `NumberAssigned`.
    FetchNumber,
}

/// Applies `action` to `state` and returns the effects to execute, in order.
pub fn update(state: &mut LandingState, action: Action) -> Vec<Effect> {
    match action {
        Action::FormLoaded => {
            state.load_count += 1;
            // Even loads are submissions. The odd load right after each
            // embed is the fresh form reporting in and must not re-trigger
            // a refresh, or the page would reload forever.
            if state.load_count % 2 != 0 {
                return Vec::new();
            }

            let mut effects = Vec::new();
            match &state.form_key {
                Some(key) => effects.push(Effect::EmbedForm {
                    form_key: key.clone(),
                }),
                None => warn!("Form loaded with no form key on record, skipping embed"),
            }
            match &state.phone_number {
                Some(number) => effects.push(Effect::RecordOutcome {
                    phone_number: number.clone(),
                    outcome: SUBMITTED_OUTCOME.to_string(),
                }),
                None => warn!("Survey submitted with no number assigned, nothing to record"),
            }
            effects
        }
        // The ack chains into exactly one replacement fetch, whatever the
        // outcome label was.
        Action::OutcomeRecorded => vec![Effect::FetchNumber],
        Action::NumberAssigned(number) => {
            state.phone_number = number;
            Vec::new()
        }
        Action::FormKeyLoaded(key) => {
            state.form_key = key;
            Vec::new()
        }
    }
}
