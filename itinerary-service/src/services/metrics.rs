use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const STAGE_DURATION_BUCKETS: &[f64] = &[0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0];

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            metrics_exporter_prometheus::Matcher::Full(
                "itinerary_stage_duration_seconds".to_string(),
            ),
            STAGE_DURATION_BUCKETS,
        )?
        .install_recorder()?;

    if METRICS_HANDLE.set(handle).is_err() {
        anyhow::bail!("metrics recorder already initialized");
    }

    Ok(())
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one finished generation. `outcome` is `success`, `failure` or
/// `configuration_error`.
pub fn record_generation(outcome: &'static str) {
    counter!("itinerary_generations_total", "outcome" => outcome).increment(1);
}

pub fn record_stage_duration(stage: &'static str, seconds: f64) {
    histogram!("itinerary_stage_duration_seconds", "stage" => stage).record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        record_generation("success");
        record_stage_duration("Travel Planner", 0.2);
    }
}
