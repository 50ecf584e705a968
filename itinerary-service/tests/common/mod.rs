#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use itinerary_service::config::{ProviderKind, Settings};
use itinerary_service::services::prompts::PipelineMode;
use itinerary_service::services::providers::mock::MockTextProvider;
use itinerary_service::startup::build_router;
use itinerary_service::AppState;
use secrecy::Secret;
use std::sync::Arc;
use tower::ServiceExt;

pub const GATE_USERNAME: &str = "explorer";
pub const GATE_PASSWORD: &str = "kashi2024";

/// Settings for tests: mock provider, multi-agent pipeline, gate off.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.server.port = 0;
    settings.model.provider = ProviderKind::Mock;
    settings.pipeline.mode = PipelineMode::MultiAgent;
    settings
}

pub fn gated_settings() -> Settings {
    let mut settings = test_settings();
    settings.features.credential_gate = true;
    settings.gate.username = GATE_USERNAME.to_string();
    settings.gate.password = Some(Secret::new(GATE_PASSWORD.to_string()));
    settings
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockTextProvider>,
}

impl TestApp {
    pub fn new(settings: Settings, provider: MockTextProvider) -> Self {
        let provider = Arc::new(provider);
        let state = AppState::new(settings, provider.clone());
        Self {
            router: build_router(state),
            provider,
        }
    }

    pub fn spawn(provider: MockTextProvider) -> Self {
        Self::new(test_settings(), provider)
    }

    /// A browser with its own cookie jar.
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }
}

pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A second tab in the same browser: shares the current session cookie.
    pub fn same_session(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    pub async fn get(&mut self, path: &str) -> Response<Body> {
        let request = Request::builder().uri(path).method("GET");
        self.send(request, Body::empty()).await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&mut self, path: &str, body: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(path)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(body.to_string())).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Response<Body> {
        self.post_form("/login", &format!("username={}&password={}", username, password))
            .await
    }

    /// GET `path` and return the status and body text.
    pub async fn page(&mut self, path: &str) -> (StatusCode, String) {
        let response = self.get(path).await;
        let status = response.status();
        (status, body_text(response).await)
    }

    async fn send(
        &mut self,
        mut request: axum::http::request::Builder,
        body: Body,
    ) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            if set_cookie.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                let pair = set_cookie.split(';').next().unwrap().trim().to_string();
                self.cookie = Some(pair);
            }
        }

        response
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Start the full server on a random port and return its base URL.
pub async fn spawn_server(provider: MockTextProvider) -> String {
    let application =
        itinerary_service::startup::Application::build_with_provider(test_settings(), Arc::new(provider))
            .await
            .expect("Failed to build application");
    let port = application.port();
    tokio::spawn(application.run_until_stopped());
    format!("http://127.0.0.1:{}", port)
}
