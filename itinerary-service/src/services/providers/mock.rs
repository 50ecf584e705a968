//! Mock provider for tests and offline demos.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Mock text provider.
///
/// Scripted responses are consumed in call order. Once the script runs out
/// the provider echoes the prompt back.
pub struct MockTextProvider {
    configured: bool,
    delay: Option<Duration>,
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn echo() -> Self {
        Self::with_script(true, VecDeque::new())
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_script(true, responses.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Every call fails with the given error message.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        let provider = Self::echo();
        if let Ok(mut script) = provider.script.lock() {
            // Far more entries than any pipeline will ask for.
            for _ in 0..64 {
                script.push_back(Err(ProviderError::ApiError(message.clone())));
            }
        }
        provider
    }

    /// Behaves like a provider whose API key is missing.
    pub fn unconfigured() -> Self {
        Self::with_script(false, VecDeque::new())
    }

    /// Hold each call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue an arbitrary result for the next unanswered call.
    pub fn push(&self, result: Result<String, ProviderError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(result);
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|prompts| prompts.len()).unwrap_or(0)
    }

    fn with_script(configured: bool, script: VecDeque<Result<String, ProviderError>>) -> Self {
        Self {
            configured,
            delay: None,
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.ensure_configured()?;

        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let text = match scripted {
            Some(result) => result?,
            None => format!("Mock response for: {}", prompt),
        };

        Ok(ProviderResponse {
            input_tokens: prompt.len() as i32,
            output_tokens: text.len() as i32,
            text,
            finish_reason: FinishReason::Complete,
        })
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.configured {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
