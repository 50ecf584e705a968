use serde::{Deserialize, Serialize};

/// Prefix that marks a failed generation when it is shown or exported as text.
pub const ERROR_MARKER: &str = "⚠️ Error: ";

/// Markdown produced by the final pipeline stage, kept as returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub markdown: String,
    /// Names of the stages that ran, in order.
    pub stages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing or unusable credentials.
    Configuration,
    /// Network failure or a rejection from the hosted model.
    Provider,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationError {
    pub kind: ErrorKind,
    pub message: String,
    /// Stage that failed, if the failure happened inside the pipeline.
    pub stage: Option<String>,
}

impl GenerationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stage: None,
        }
    }

    pub fn in_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn display_text(&self) -> String {
        format!("{}{}", ERROR_MARKER, self.message)
    }
}

/// Result of one Generate action as held in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationOutcome {
    Success(Itinerary),
    Failure(GenerationError),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    /// Text shown to the user and offered for download. Failures keep the
    /// error marker so an exported file says what went wrong.
    pub fn text(&self) -> String {
        match self {
            GenerationOutcome::Success(itinerary) => itinerary.markdown.clone(),
            GenerationOutcome::Failure(error) => error.display_text(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationOutcome::Success(_) => "success",
            GenerationOutcome::Failure(_) => "failure",
        }
    }
}
