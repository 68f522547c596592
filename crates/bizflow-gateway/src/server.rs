use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use bizflow_automation::AutomationService;
use bizflow_core::config::GatewayConfig;

use crate::routes;
use crate::state::AppState;

/// HTTP gateway server built on axum.
pub struct GatewayServer {
    config: GatewayConfig,
    service: Arc<AutomationService>,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, service: Arc<AutomationService>) -> Self {
        Self { config, service }
    }

    /// The API router with its shared state attached.
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            config: self.config.clone(),
            service: self.service.clone(),
        });

        Router::new()
            .route("/api/health", get(routes::health))
            .route("/api/automations/execute", post(routes::execute_automation))
            .route(
                "/api/automations/{id}/executions",
                get(routes::list_executions),
            )
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Run the gateway server until the cancellation token is triggered.
    pub async fn run(&self, shutdown: CancellationToken) -> anyhow::Result<()> {
        if self.config.api_keys.is_empty() {
            warn!("No API keys configured; every authenticated route will return 401");
        }

        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind).await?;
        info!(bind = %self.config.bind, "Gateway listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        info!("Gateway shut down");
        Ok(())
    }
}
