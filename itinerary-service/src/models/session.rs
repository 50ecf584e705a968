//! Per-session planner state.
//!
//! Everything the page needs between requests lives in one
//! [`PlannerSession`] value stored under [`SESSION_KEY`] in the user's
//! `tower-sessions` session. Nothing is shared between sessions.

use super::{GenerationOutcome, Language};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use tower_sessions::Session;

pub const SESSION_KEY: &str = "planner";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    /// No held result; the form is shown.
    Idle,
    /// A generation finished (successfully or not) and its text is shown.
    ResultHeld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashLevel {
    Warning,
    Error,
}

/// One-shot notice rendered on the next page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// CSS class suffix used by the templates.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Warning => "warning",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerSession {
    /// Query that produced the held result. Empty while Idle.
    pub query: String,
    pub language: Language,
    pub result: Option<GenerationOutcome>,
    pub authenticated: bool,
    #[serde(default)]
    pub flash: Option<Flash>,
}

impl PlannerSession {
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        let planner: Option<Self> = session
            .get(SESSION_KEY)
            .await
            .map_err(|e| AppError::SessionError(e.to_string()))?;
        Ok(planner.unwrap_or_default())
    }

    pub async fn save(&self, session: &Session) -> Result<(), AppError> {
        session
            .insert(SESSION_KEY, self)
            .await
            .map_err(|e| AppError::SessionError(e.to_string()))
    }

    pub fn state(&self) -> PlannerState {
        if self.result.is_some() {
            PlannerState::ResultHeld
        } else {
            PlannerState::Idle
        }
    }

    /// Replace whatever was held with a fresh outcome.
    pub fn hold(&mut self, query: String, language: Language, outcome: GenerationOutcome) {
        self.query = query;
        self.language = language;
        self.result = Some(outcome);
    }

    /// Back to Idle. Resetting an Idle session changes nothing.
    pub fn reset(&mut self) {
        self.query.clear();
        self.result = None;
    }

    /// Exact text offered by the download action, if anything is held.
    pub fn download_body(&self) -> Option<String> {
        self.result.as_ref().map(GenerationOutcome::text)
    }

    pub fn set_flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}
