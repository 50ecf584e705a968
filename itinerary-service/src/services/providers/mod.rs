//! Hosted text model abstraction.
//!
//! The pipeline only sees [`TextProvider`]; Gemini is the production backend
//! and [`mock::MockTextProvider`] answers from a script.

pub mod gemini;
pub mod mock;

use crate::config::{ModelSettings, ProviderKind};
use crate::models::ErrorKind;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited by the model provider")]
    RateLimited,

    #[error("Response blocked by the provider's content filter")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::NotConfigured(_) => ErrorKind::Configuration,
            _ => ErrorKind::Provider,
        }
    }
}

/// Text returned by one model call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Sampling parameters forwarded to the model.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a text response for a single prompt.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Cheap local check that a call could be attempted at all (credentials
    /// present). Does not touch the network.
    fn ensure_configured(&self) -> Result<(), ProviderError>;

    /// Readiness probe used by `/ready`.
    async fn health_check(&self) -> bool {
        self.ensure_configured().is_ok()
    }

    /// Name used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// Build the provider selected in configuration.
pub fn build_provider(settings: &ModelSettings) -> Result<Arc<dyn TextProvider>, ProviderError> {
    let provider: Arc<dyn TextProvider> = match settings.provider {
        ProviderKind::Gemini => {
            let timeout = match settings.timeout_seconds {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
            Arc::new(gemini::GeminiTextProvider::new(gemini::GeminiConfig {
                api_key_env: settings.api_key_env.clone(),
                model: settings.model.clone(),
                timeout,
            })?)
        }
        ProviderKind::Mock => Arc::new(mock::MockTextProvider::echo()),
    };

    tracing::info!(
        provider = provider.name(),
        model = %settings.model,
        "Initialized text provider"
    );

    Ok(provider)
}
