//! User-account CRUD.
//!
//! This surface ships unguarded for wire compatibility with the source
//! system (documented gap, see DESIGN.md); `RoleGuard` makes adding an
//! admin requirement a one-line change in `server.rs`.

use crate::entity::user;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Account row without the password column.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct UserRow {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Role")]
    pub role: i32,
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Role")]
    pub role: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Role")]
    pub role: i32,
}

/// `GET /api/users`
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let rows = user::Entity::find()
        .select_only()
        .column(user::Column::UserId)
        .column(user::Column::Username)
        .column(user::Column::FullName)
        .column(user::Column::Email)
        .column(user::Column::Role)
        .into_model::<UserRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `POST /api/users/add`
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = user::ActiveModel {
        username: Set(request.username),
        password: Set(request.password),
        full_name: Set(request.full_name),
        email: Set(request.email),
        role: Set(request.role),
        ..Default::default()
    };

    account.insert(&state.db).await?;

    Ok(Json(json!({ "message": "User created successfully" })))
}

/// `PUT /api/users/update/{id}`
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    user::Entity::update_many()
        .col_expr(user::Column::Username, Expr::value(request.username))
        .col_expr(user::Column::FullName, Expr::value(request.full_name))
        .col_expr(user::Column::Email, Expr::value(request.email))
        .col_expr(user::Column::Role, Expr::value(request.role))
        .filter(user::Column::UserId.eq(id))
        .exec(&state.db)
        .await?;

    Ok(Json(json!({ "message": "User updated successfully" })))
}

/// `DELETE /api/users/delete/{id}`
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    user::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(json!({ "message": "User deleted" })))
}
