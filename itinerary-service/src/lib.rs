pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use config::Settings;
use services::providers::GenerationParams;
use services::{CredentialVerifier, ItineraryPipeline, StaticCredentialVerifier, TextProvider};
use std::sync::Arc;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub pipeline: Arc<ItineraryPipeline>,
    /// Present only when the credential gate is enabled.
    pub verifier: Option<Arc<dyn CredentialVerifier>>,
}

impl AppState {
    pub fn new(settings: Settings, provider: Arc<dyn TextProvider>) -> Self {
        let params = GenerationParams {
            temperature: settings.model.temperature,
            max_tokens: None,
        };
        let pipeline = ItineraryPipeline::new(provider, settings.pipeline.mode, params);

        let verifier = if settings.features.credential_gate {
            StaticCredentialVerifier::from_settings(&settings.gate)
                .map(|v| Arc::new(v) as Arc<dyn CredentialVerifier>)
        } else {
            None
        };

        Self {
            settings: Arc::new(settings),
            pipeline: Arc::new(pipeline),
            verifier,
        }
    }

    pub fn gate_enabled(&self) -> bool {
        self.settings.features.credential_gate
    }

    pub fn language_selection(&self) -> bool {
        self.settings.features.language_selection
    }
}
