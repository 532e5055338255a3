//! GUI application state management.
//!
//! Holds form input and messages shown on the start screen. Quiz progress and
//! request status live in the `SessionDriver`.

use crate::session::PlayerIdentity;

/// GUI state outside the session driver.
#[derive(Debug, Default)]
pub struct GuiState {
    /// Start form inputs.
    pub company: String,
    pub employee_id: String,
    pub name: String,
    /// Answer being typed for the current puzzle.
    pub answer: String,
    /// Validation or start failure shown under the start form.
    pub start_error: Option<String>,
    /// Baseline content failure; blocks play.
    pub content_error: Option<String>,
}

impl GuiState {
    /// State with the start form pre-filled.
    pub fn with_identity(identity: &PlayerIdentity) -> Self {
        Self {
            company: identity.company.clone(),
            employee_id: identity.employee_id.clone(),
            name: identity.name.clone(),
            ..Self::default()
        }
    }

    /// Identity from the form, trimmed.
    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity::new(&self.company, &self.employee_id, &self.name)
    }

    /// Clears per-session fields, keeping the form inputs.
    pub fn reset_session(&mut self) {
        self.answer.clear();
        self.start_error = None;
    }
}
