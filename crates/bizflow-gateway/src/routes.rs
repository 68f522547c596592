use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::middleware::Authenticated;
use crate::state::AppState;

const MAX_EXECUTIONS: usize = 100;

// GET /api/health (no auth)
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteBody {
    #[serde(default)]
    pub automation_id: Option<String>,
    #[serde(default)]
    pub trigger_data: Option<Value>,
}

// POST /api/automations/execute
pub async fn execute_automation(
    Authenticated(auth_result): Authenticated,
    State(state): State<Arc<AppState>>,
    body: Result<Json<ExecuteBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let automation_id = body.automation_id.unwrap_or_default();
    let trigger_data = body
        .trigger_data
        .unwrap_or_else(|| Value::Object(Default::default()));

    info!(
        key = %auth_result.name,
        automation_id = %automation_id,
        "Execute automation requested"
    );
    let report = state
        .service
        .execute(&auth_result.caller, &automation_id, trigger_data)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "executionId": report.execution_id,
        "result": report.result,
    })))
}

#[derive(Deserialize)]
pub struct ExecutionsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

// GET /api/automations/{id}/executions?limit=20
pub async fn list_executions(
    Authenticated(auth_result): Authenticated,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<ExecutionsQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let limit = q.limit.clamp(1, MAX_EXECUTIONS);
    let executions = state
        .service
        .executions(&auth_result.caller, &id, limit)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "executions": executions,
    })))
}
