use crate::models::{Flash, GenerationOutcome, Language, PlannerSession};
use crate::services::render::markdown_to_html;
use crate::AppState;
use askama::Template;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use tower_sessions::Session;

pub struct LanguageOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Held outcome, prepared for the page.
pub struct ResultView {
    pub is_error: bool,
    /// Rendered itinerary HTML; empty for errors.
    pub html: String,
    /// Error text including the marker; empty for itineraries.
    pub error: String,
    pub stages: Vec<String>,
}

impl ResultView {
    fn from_outcome(outcome: &GenerationOutcome) -> Self {
        match outcome {
            GenerationOutcome::Success(itinerary) => Self {
                is_error: false,
                html: markdown_to_html(&itinerary.markdown),
                error: String::new(),
                stages: itinerary.stages.clone(),
            },
            GenerationOutcome::Failure(error) => Self {
                is_error: true,
                html: String::new(),
                error: error.display_text(),
                stages: error.stage.iter().cloned().collect(),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flash: Option<Flash>,
    pub query: String,
    pub languages: Vec<LanguageOption>,
    pub language_selection: bool,
    pub gate_enabled: bool,
    pub result: Option<ResultView>,
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<IndexTemplate, AppError> {
    let mut planner = PlannerSession::load(&session).await?;
    let flash = planner.take_flash();
    if flash.is_some() {
        planner.save(&session).await?;
    }

    let selected = planner.language;
    let languages = Language::ALL
        .into_iter()
        .map(|language| LanguageOption {
            value: language.form_value(),
            label: language.label(),
            selected: language == selected,
        })
        .collect();

    Ok(IndexTemplate {
        flash,
        query: planner.query.clone(),
        languages,
        language_selection: state.language_selection(),
        gate_enabled: state.gate_enabled(),
        result: planner.result.as_ref().map(ResultView::from_outcome),
    })
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "itinerary-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 503 until the model provider has usable credentials.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.pipeline.is_ready().await {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "reason": "model provider not configured" })),
        )
    }
}
