//! Planner actions. Every POST ends in a redirect back to `/`.

use crate::models::{Flash, Language, PlannerSession};
use crate::services::PipelineError;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;

pub const DOWNLOAD_FILENAME: &str = "travel_itinerary.md";

#[derive(Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub query: String,
    pub language: Option<String>,
}

/// Runs the pipeline before touching the session, so changes saved by other
/// requests while the model works are kept. When the credential gate is on,
/// the gate has already loaded the session and the last write still wins.
pub async fn generate(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GenerateForm>,
) -> Result<Redirect, AppError> {
    let language = match (state.language_selection(), form.language.as_deref()) {
        (true, Some(value)) => Language::from_form_value(value),
        _ => Language::default(),
    };

    let result = state.pipeline.run(&form.query, language).await;
    let mut planner = PlannerSession::load(&session).await?;

    match result {
        Ok(outcome) => {
            if outcome.is_success() {
                tracing::info!(language = language.form_value(), "Itinerary held in session");
            } else {
                tracing::warn!(outcome = %outcome.text(), "Generation failed; error held in session");
            }
            planner.hold(form.query, language, outcome);
        }
        Err(PipelineError::EmptyQuery) => {
            tracing::debug!("Generate pressed with an empty query");
            planner.set_flash(Flash::warning(PipelineError::EmptyQuery.to_string()));
        }
        Err(e @ PipelineError::Configuration(_)) => {
            tracing::error!(error = %e, "Generation refused");
            planner.set_flash(Flash::error(e.to_string()));
        }
    }

    planner.save(&session).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset(session: Session) -> Result<Redirect, AppError> {
    let mut planner = PlannerSession::load(&session).await?;
    planner.reset();
    planner.save(&session).await?;
    Ok(Redirect::to("/"))
}

/// Offer the held text, byte for byte, as a Markdown file.
pub async fn download(session: Session) -> Result<Response, AppError> {
    let planner = PlannerSession::load(&session).await?;
    let body = planner
        .download_body()
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No itinerary to download")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
