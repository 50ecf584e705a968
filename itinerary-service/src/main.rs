use dotenvy::dotenv;
use itinerary_service::config::get_configuration;
use itinerary_service::services::metrics::init_metrics;
use itinerary_service::startup::Application;
use service_core::observability::logging::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "itinerary-service",
        &configuration.server.log_level,
        configuration.server.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    let application = Application::build(configuration)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?;

    info!(port = application.port(), "Starting itinerary-service");

    application.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
