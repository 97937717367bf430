//! API route handlers
//!
//! Handlers are organized by surface:
//!
//! - `health`: liveness and readiness probes
//! - `auth`: login
//! - `users`: user-account CRUD
//! - `admin_class`: class administration
//! - `teacher`: teacher surface (scores, schedule, teaching classes)
//! - `parent`: parent surface (scores, messages, leave requests)

pub mod admin_class;
pub mod auth;
pub mod health;
pub mod parent;
pub mod teacher;
pub mod users;

use crate::error::{ApiError, ApiResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info; the only route with no auth story at all.
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "schoolgate",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/auth/login",
            "/api/users",
            "/admin/classes",
            "/api/teacher",
            "/api/parent",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 fallback for undefined routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}
