use crate::auth::Role;
use crate::entity::user;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "Username", default)]
    pub username: Option<String>,
    #[serde(rename = "Password", default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Role")]
    pub role: i32,
    #[serde(rename = "Email")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: LoginUser,
}

/// `POST /api/auth/login`
///
/// Known defect, preserved from the source system: passwords are stored and
/// compared in plaintext. See DESIGN.md.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (username, password) = match (request.username, request.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Missing Username or Password".to_string(),
            ))
        }
    };

    let found = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .filter(user::Column::Password.eq(&password))
        .one(&state.db)
        .await?;

    let account = found.ok_or_else(|| {
        ApiError::Unauthenticated("Invalid username or password".to_string())
    })?;

    let role = Role::try_from(account.role)
        .map_err(|e| ApiError::Internal(format!("corrupt role for user {}: {e}", account.user_id)))?;

    let token = state
        .tokens
        .issue(account.user_id, &account.username, role, &account.full_name)?;

    tracing::info!(user_id = account.user_id, role = %role, "login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: LoginUser {
            user_id: account.user_id,
            username: account.username,
            full_name: account.full_name,
            role: account.role,
            email: account.email,
        },
    }))
}
