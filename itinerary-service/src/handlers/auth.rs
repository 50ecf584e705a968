use crate::models::{Flash, PlannerSession};
use crate::services::Credentials;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use service_core::error::AppError;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flash: Option<Flash>,
}

fn gate_disabled() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Login is not enabled"))
}

pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    if !state.gate_enabled() {
        return Err(gate_disabled());
    }

    let mut planner = PlannerSession::load(&session).await?;
    if planner.authenticated {
        return Ok(Redirect::to("/").into_response());
    }

    let flash = planner.take_flash();
    if flash.is_some() {
        planner.save(&session).await?;
    }

    Ok(LoginTemplate { flash }.into_response())
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(credentials): Form<Credentials>,
) -> Result<Redirect, AppError> {
    if !state.gate_enabled() {
        return Err(gate_disabled());
    }

    let verified = state
        .verifier
        .as_ref()
        .is_some_and(|verifier| verifier.verify(&credentials));

    let mut planner = PlannerSession::load(&session).await?;

    if verified {
        // Fresh session id on privilege change.
        session
            .cycle_id()
            .await
            .map_err(|e| AppError::SessionError(e.to_string()))?;
        planner.authenticated = true;
        planner.save(&session).await?;

        tracing::info!(username = %credentials.username, "Login accepted");
        Ok(Redirect::to("/"))
    } else {
        planner.set_flash(Flash::error("Invalid username or password"));
        planner.save(&session).await?;

        tracing::warn!(username = %credentials.username, "Login rejected");
        Ok(Redirect::to("/login"))
    }
}

pub async fn logout_handler(session: Session) -> Result<Redirect, AppError> {
    // Drops the held result too, and deletes the record from the store.
    session
        .flush()
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    tracing::info!("Session cleared on logout");
    Ok(Redirect::to("/"))
}
