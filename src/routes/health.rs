use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Liveness probe; returns 200 whenever the process is up.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "schoolgate",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Readiness probe; verifies the database pool answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    state
        .db
        .ping()
        .await
        .map_err(|e| ApiError::Internal(format!("database not reachable: {e}")))?;

    Ok(Json(json!({
        "status": "ready",
        "service": "schoolgate",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": {
            "api": "ready",
            "database": "ready",
        }
    })))
}
