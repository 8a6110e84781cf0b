//! # Landing Session State
//!
//! All mutable values of one caller landing session live here. The console
//! renders from this struct and never reads back anything it printed.
//!
//! ```text
//! LandingState
//! ├── load_count: u64              // embed-load events seen, only grows
//! ├── phone_number: Option<String> // number currently assigned to the operator
//! └── form_key: Option<String>     // key of the survey form being embedded
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

/// State for one caller landing session.
#[derive(Debug, Clone, PartialEq)]
pub struct LandingState {
    /// Number of embed-load events delivered this session. Only ever
    /// increases; parity decides whether a load is a survey submission
    /// (even) or a fresh embed reporting in (odd).
    pub load_count: u64,
    /// The number currently assigned to the operator. `None` before the
    /// first fetch and once the pool runs dry.
    pub phone_number: Option<String>,
    /// Key of the survey form currently being embedded.
    pub form_key: Option<String>,
}

impl LandingState {
    pub fn new() -> Self {
        Self {
            load_count: 0,
            phone_number: None,
            form_key: None,
        }
    }
}

impl Default for LandingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_empty() {
        let state = LandingState::new();
        assert_eq!(state.load_count, 0);
        assert!(state.phone_number.is_none());
        assert!(state.form_key.is_none());
    }
}
