//! Router assembly and server lifecycle.

use crate::config::Settings;
use crate::handlers::{
    app::{health_check, index, readiness},
    auth::{login_handler, login_page, logout_handler},
    metrics::metrics,
    planner::{download, generate, reset},
};
use crate::middleware::require_login;
use crate::services::{build_provider, TextProvider};
use crate::AppState;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use service_core::observability::REQUEST_ID_HEADER;
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub const SESSION_COOKIE_NAME: &str = "itinerary_session";

pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(state.settings.session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            state.settings.session.inactivity_hours,
        )));

    let planner = Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/reset", post(reset))
        .route("/download", get(download))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    Router::new()
        .merge(planner)
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .route("/metrics", get(metrics))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the trace span above already sees the id.
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build with the provider selected in `settings.model`.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let provider = build_provider(&settings.model).map_err(|e| {
            tracing::error!("Failed to initialize text provider: {}", e);
            AppError::ConfigError(e.into())
        })?;

        Self::build_with_provider(settings, provider).await
    }

    pub async fn build_with_provider(
        settings: Settings,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        if !provider.health_check().await {
            tracing::warn!(
                env = %settings.model.api_key_env,
                "Model provider is not configured; generation will be refused until it is"
            );
        }

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        // Port 0 binds a random port for tests.
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            mode = ?settings.pipeline.mode,
            credential_gate = settings.features.credential_gate,
            language_selection = settings.features.language_selection,
            "Itinerary service configured"
        );

        Ok(Self {
            port,
            listener,
            state: AppState::new(settings, provider),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
