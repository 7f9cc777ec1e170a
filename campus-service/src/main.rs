use campus_service::config::CampusConfig;
use campus_service::startup::{build_provider, Application};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = CampusConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "campus-service",
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        environment = ?config.environment,
        provider = ?config.provider,
        "Starting campus service"
    );

    let provider = build_provider(&config).map_err(|e| {
        tracing::error!("Failed to initialize completion provider: {}", e);
        std::io::Error::other(format!("Provider error: {}", e))
    })?;

    let app = Application::build(config, provider).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
