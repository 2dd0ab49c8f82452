//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` through the link store
/// 2. **Notification queue**: Backend ping
/// 3. **Key material**: Store readable; a deployment that has not issued a
///    token yet reports `ok` with a pending message
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let notification_queue = check_queue(&state).await;
    let key_material = check_key_material(&state).await;

    let all_healthy = database.is_ok() && notification_queue.is_ok() && key_material.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            notification_queue,
            key_material,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.ping_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

async fn check_queue(state: &AppState) -> CheckStatus {
    let backend = state.queue.backend();

    if state.queue.health_check().await {
        CheckStatus::ok(format!("Backend: {backend}"))
    } else {
        CheckStatus::error(format!("Backend {backend} unreachable"))
    }
}

async fn check_key_material(state: &AppState) -> CheckStatus {
    match state.session_service.keys_ready().await {
        Ok(true) => CheckStatus::ok("Provisioned"),
        Ok(false) => CheckStatus::ok("Pending first token issuance"),
        Err(e) => CheckStatus::error(format!("Secret store error: {e}")),
    }
}
