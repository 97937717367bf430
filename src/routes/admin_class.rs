//! Class administration: lookup lists and class CRUD.
//!
//! Unguarded for wire compatibility with the source system (documented gap,
//! see DESIGN.md).

use crate::entity::{academic_year, class, user};
use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize, FromQueryResult)]
pub struct YearRow {
    #[serde(rename = "YearID")]
    pub year_id: i32,
    #[serde(rename = "AcademicYearName")]
    pub academic_year_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct TeacherRow {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "FullName")]
    pub full_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct ClassRow {
    #[serde(rename = "ClassID")]
    pub class_id: i32,
    #[serde(rename = "ClassName")]
    pub class_name: String,
    #[serde(rename = "AcademicYearName")]
    pub academic_year_name: String,
    #[serde(rename = "HomeroomTeacherID")]
    pub homeroom_teacher_id: Option<i32>,
    #[serde(rename = "TeacherName")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    #[serde(rename = "ClassName")]
    pub class_name: String,
    #[serde(rename = "HomeroomTeacherID", default)]
    pub homeroom_teacher_id: Option<i32>,
    #[serde(rename = "YearID")]
    pub year_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClassRequest {
    #[serde(rename = "ClassID")]
    pub class_id: i32,
    #[serde(rename = "ClassName")]
    pub class_name: String,
    #[serde(rename = "HomeroomTeacherID", default)]
    pub homeroom_teacher_id: Option<i32>,
    #[serde(rename = "YearID")]
    pub year_id: i32,
}

/// `GET /admin/years`
pub async fn years(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let rows = academic_year::Entity::find()
        .select_only()
        .column(academic_year::Column::YearId)
        .column(academic_year::Column::AcademicYearName)
        .order_by_desc(academic_year::Column::AcademicYearName)
        .into_model::<YearRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /admin/teachers`
pub async fn teachers(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let rows = user::Entity::find()
        .select_only()
        .column(user::Column::UserId)
        .column(user::Column::FullName)
        .filter(user::Column::Role.eq(2))
        .into_model::<TeacherRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /admin/classes/{year_id}`
pub async fn classes_by_year(
    State(state): State<Arc<AppState>>,
    Path(year_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let rows = class::Entity::find()
        .join(JoinType::InnerJoin, class::Relation::AcademicYear.def())
        .join(JoinType::LeftJoin, class::Relation::HomeroomTeacher.def())
        .filter(class::Column::YearId.eq(year_id))
        .select_only()
        .column(class::Column::ClassId)
        .column(class::Column::ClassName)
        .column_as(
            Expr::col((academic_year::Entity, academic_year::Column::AcademicYearName)),
            "academic_year_name",
        )
        .column(class::Column::HomeroomTeacherId)
        .column_as(Expr::col((user::Entity, user::Column::FullName)), "teacher_name")
        .order_by_asc(class::Column::ClassName)
        .into_model::<ClassRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `POST /admin/class`
pub async fn create_class(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateClassRequest>,
) -> ApiResult<impl IntoResponse> {
    let model = class::ActiveModel {
        class_name: Set(request.class_name),
        homeroom_teacher_id: Set(request.homeroom_teacher_id),
        year_id: Set(request.year_id),
        ..Default::default()
    };

    model.insert(&state.db).await?;

    Ok(Json(json!({ "message": "Class created" })))
}

/// `PUT /admin/class`
pub async fn update_class(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateClassRequest>,
) -> ApiResult<impl IntoResponse> {
    class::Entity::update_many()
        .col_expr(class::Column::ClassName, Expr::value(request.class_name))
        .col_expr(
            class::Column::HomeroomTeacherId,
            Expr::value(request.homeroom_teacher_id),
        )
        .col_expr(class::Column::YearId, Expr::value(request.year_id))
        .filter(class::Column::ClassId.eq(request.class_id))
        .exec(&state.db)
        .await?;

    Ok(Json(json!({ "message": "Class updated" })))
}

/// `DELETE /admin/class/{id}`
pub async fn delete_class(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    class::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(json!({ "message": "Class deleted" })))
}
