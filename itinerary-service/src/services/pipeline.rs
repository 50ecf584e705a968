//! Runs the prompt stages for one Generate action.

use crate::models::{GenerationError, GenerationOutcome, Itinerary, Language, TripQuery};
use crate::services::metrics::{record_generation, record_stage_duration};
use crate::services::prompts::{render_prompt, PipelineMode, StageDescriptor};
use crate::services::providers::{FinishReason, GenerationParams, ProviderError, TextProvider};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Failures that stop a run before any stage is attempted. Nothing is held
/// in the session for these.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Please describe your trip before generating")]
    EmptyQuery,

    #[error("Model provider is not configured: {0}")]
    Configuration(String),
}

pub struct ItineraryPipeline {
    provider: Arc<dyn TextProvider>,
    stages: Vec<StageDescriptor>,
    params: GenerationParams,
}

impl ItineraryPipeline {
    pub fn new(provider: Arc<dyn TextProvider>, mode: PipelineMode, params: GenerationParams) -> Self {
        Self::with_stages(provider, mode.stages().to_vec(), params)
    }

    pub fn with_stages(
        provider: Arc<dyn TextProvider>,
        stages: Vec<StageDescriptor>,
        params: GenerationParams,
    ) -> Self {
        Self {
            provider,
            stages,
            params,
        }
    }

    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    pub async fn is_ready(&self) -> bool {
        self.provider.health_check().await
    }

    /// Run every stage for `query`.
    ///
    /// Provider failures during a stage end the run and come back as
    /// `Ok(GenerationOutcome::Failure(..))` so they can be held and shown.
    #[instrument(
        skip(self, query),
        fields(provider = self.provider.name(), language = language.form_value())
    )]
    pub async fn run(
        &self,
        query: &str,
        language: Language,
    ) -> Result<GenerationOutcome, PipelineError> {
        let query = TripQuery::parse(query).ok_or(PipelineError::EmptyQuery)?;

        if let Err(e) = self.provider.ensure_configured() {
            warn!(error = %e, "Provider not configured; no stage was run");
            record_generation("configuration_error");
            return Err(PipelineError::Configuration(e.to_string()));
        }

        let mut previous: Option<String> = None;

        for batch in self.batches() {
            let calls = batch
                .iter()
                .map(|stage| self.run_stage(stage, &query, language, previous.as_deref()));
            let results = join_all(calls).await;

            for (stage, result) in batch.iter().zip(results) {
                match result {
                    Ok(text) => previous = Some(text),
                    Err(e) => {
                        warn!(stage = stage.name, error = %e, "Stage failed; stopping run");
                        let outcome = GenerationOutcome::Failure(
                            GenerationError::new(e.kind(), e.to_string()).in_stage(stage.name),
                        );
                        record_generation(outcome.label());
                        return Ok(outcome);
                    }
                }
            }
        }

        let markdown = previous
            .ok_or_else(|| PipelineError::Configuration("no pipeline stages configured".to_string()))?;

        info!(
            stages = self.stages.len(),
            output_len = markdown.len(),
            "Itinerary generated"
        );

        let outcome = GenerationOutcome::Success(Itinerary {
            markdown,
            stages: self.stages.iter().map(|s| s.name.to_string()).collect(),
        });
        record_generation(outcome.label());
        Ok(outcome)
    }

    /// Split the stage list at every stage that embeds its predecessor's
    /// output. Stages inside one batch run concurrently.
    fn batches(&self) -> Vec<&[StageDescriptor]> {
        let mut batches = Vec::new();
        let mut start = 0;

        for (i, stage) in self.stages.iter().enumerate().skip(1) {
            if stage.depends_on_previous {
                batches.push(&self.stages[start..i]);
                start = i;
            }
        }

        if start < self.stages.len() {
            batches.push(&self.stages[start..]);
        }

        batches
    }

    async fn run_stage(
        &self,
        stage: &StageDescriptor,
        query: &TripQuery,
        language: Language,
        previous: Option<&str>,
    ) -> Result<String, ProviderError> {
        let prompt = render_prompt(stage, query, language, previous);
        let started = Instant::now();

        let response = self.provider.generate(&prompt, &self.params).await;
        record_stage_duration(stage.name, started.elapsed().as_secs_f64());
        let response = response?;

        if response.finish_reason == FinishReason::Length {
            warn!(stage = stage.name, "Stage output was truncated at the token limit");
        }

        info!(
            stage = stage.name,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage completed"
        );

        Ok(response.text)
    }
}
