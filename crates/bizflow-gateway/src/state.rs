use std::sync::Arc;

use bizflow_automation::AutomationService;
use bizflow_core::config::GatewayConfig;

/// Shared application state for axum handlers.
pub struct AppState {
    pub config: GatewayConfig,
    pub service: Arc<AutomationService>,
}
