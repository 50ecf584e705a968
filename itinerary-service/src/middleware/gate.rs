use crate::models::PlannerSession;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use service_core::error::AppError;
use tower_sessions::Session;

/// Send unauthenticated sessions to the login page while the credential
/// gate is enabled. A no-op otherwise.
pub async fn require_login(
    State(state): State<AppState>,
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !state.gate_enabled() {
        return Ok(next.run(request).await);
    }

    let planner = PlannerSession::load(&session).await?;
    if !planner.authenticated {
        tracing::debug!(path = %request.uri().path(), "Unauthenticated request redirected to login");
        return Ok(Redirect::to("/login").into_response());
    }

    Ok(next.run(request).await)
}
