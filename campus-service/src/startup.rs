//! Application startup and lifecycle management.

use crate::config::{CampusConfig, ProviderKind};
use crate::handlers::{health, info, operations};
use crate::services::metrics::metrics_middleware;
use crate::services::providers::mock::MockCompletionProvider;
use crate::services::providers::openai::OpenAiCompletionProvider;
use crate::services::CompletionProvider;
use crate::templates::TemplateRegistry;
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{http_trace_layer, open_cors_layer, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state. Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CampusConfig>,
    pub templates: Arc<TemplateRegistry>,
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(config: CampusConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            templates: Arc::new(TemplateRegistry::builtin()),
            provider,
        }
    }
}

/// Pick the completion backend named by the configuration.
pub fn build_provider(config: &CampusConfig) -> Result<Arc<dyn CompletionProvider>, AppError> {
    match config.provider {
        ProviderKind::OpenAi => {
            if config.openai.api_key.is_none() {
                tracing::warn!(
                    "OPENAI_API_KEY is not set; completion requests will fail until it is configured"
                );
            }
            let provider = OpenAiCompletionProvider::new(config.openai.clone())?;
            tracing::info!(
                model = %config.openai.model,
                base_url = %config.openai.base_url,
                "Initialized OpenAI completion provider"
            );
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => {
            tracing::info!("Using mock completion provider");
            Ok(Arc::new(MockCompletionProvider::echo()))
        }
    }
}

/// Build the HTTP router.
///
/// Fails if any operation's template does not ask for exactly the fields its
/// request body supplies.
pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let operation_routes = operations::routes(&state.templates)?;

    let app = Router::new()
        .route("/", get(info::root))
        .route("/erp", get(info::erp_overview))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .merge(operation_routes)
        .layer(from_fn(metrics_middleware))
        .with_state(state)
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(open_cors_layer());

    Ok(app)
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration and provider.
    pub async fn build(
        config: CampusConfig,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let state = AppState::new(config, provider);
        let router = build_router(state)?;

        // port 0 = random port for testing
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Campus service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
