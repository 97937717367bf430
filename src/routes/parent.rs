//! Parent surface: linked student, scores, teachers, messaging, weekly
//! timetable, leave requests, profile, children and attendance.
//!
//! The lookup lists (`years`, `semesters`, `notifications`) are mounted
//! outside the guard for wire compatibility with the source system.

use crate::auth::AuthUser;
use crate::entity::{
    academic_year, attendance, class, leave_request, message, notification, score, semester,
    student, subject, timetable, user,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{Datelike, Days, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct LinkedStudentResponse {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "ClassName")]
    pub class_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct YearRow {
    #[serde(rename = "YearID")]
    pub year_id: i32,
    #[serde(rename = "AcademicYearName")]
    pub academic_year_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct SemesterRow {
    #[serde(rename = "SemesterID")]
    pub semester_id: i32,
    #[serde(rename = "SemesterName")]
    pub semester_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct SubjectScoreRow {
    #[serde(rename = "SubjectName")]
    pub subject_name: String,
    #[serde(rename = "Scorehs1")]
    pub scorehs1: Option<f64>,
    #[serde(rename = "Scorehs2")]
    pub scorehs2: Option<f64>,
    #[serde(rename = "Scorehs3")]
    pub scorehs3: Option<f64>,
    #[serde(rename = "ScoreTBM")]
    pub score_tbm: Option<f64>,
    #[serde(rename = "TeacherComment")]
    pub teacher_comment: Option<String>,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct TeacherContactRow {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "RoleName")]
    pub role_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct MessageRow {
    #[serde(rename = "MessageID")]
    pub message_id: i32,
    #[serde(rename = "SenderID")]
    pub sender_id: i32,
    #[serde(rename = "ReceiverID")]
    pub receiver_id: i32,
    #[serde(rename = "SentTime")]
    pub sent_time: chrono::DateTime<Utc>,
    #[serde(rename = "Contents")]
    pub contents: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(rename = "ReceiverID", default)]
    pub receiver_id: Option<i32>,
    #[serde(rename = "Contents", default)]
    pub contents: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TimetableQuery {
    #[serde(default)]
    pub monday: Option<NaiveDate>,
}

#[derive(Debug, FromQueryResult)]
struct LessonRow {
    lesson_date: NaiveDate,
    lesson_slot: i32,
    subject_name: String,
    teacher_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Lesson {
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: u32,
    #[serde(rename = "LessonSlot")]
    pub lesson_slot: i32,
    #[serde(rename = "LessonDate")]
    pub lesson_date: NaiveDate,
    #[serde(rename = "SubjectName")]
    pub subject_name: String,
    #[serde(rename = "TeacherName")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeaveRequest {
    #[serde(rename = "Reason", default)]
    pub reason: Option<String>,
    #[serde(rename = "FromDate", default)]
    pub from_date: Option<NaiveDate>,
    #[serde(rename = "ToDate", default)]
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct LeaveRequestRow {
    #[serde(rename = "RequestID")]
    pub request_id: i32,
    #[serde(rename = "CreatedAt")]
    pub created_at: chrono::DateTime<Utc>,
    #[serde(rename = "FromDate")]
    pub from_date: NaiveDate,
    #[serde(rename = "ToDate")]
    pub to_date: NaiveDate,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "TeacherNote")]
    pub teacher_note: Option<String>,
    #[serde(rename = "TeacherName")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct NameRow {
    full_name: String,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct ParentProfileRow {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct ChildRow {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "DateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "ClassName")]
    pub class_name: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct AttendanceRow {
    date: NaiveDate,
    status: i32,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct NotificationRow {
    #[serde(rename = "NotificationID")]
    pub notification_id: i32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Contents")]
    pub contents: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: chrono::DateTime<Utc>,
}

/// `GET /api/parent/student`
///
/// The first linked student; a parent without one still gets a 200 with a
/// placeholder so the client renders an empty dashboard instead of an error.
pub async fn linked_student(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let found = student::Entity::find()
        .filter(student::Column::ParentId.eq(caller.user_id))
        .find_also_related(class::Entity)
        .one(&state.db)
        .await?;

    let response = match found {
        Some((pupil, joined_class)) => LinkedStudentResponse {
            full_name: pupil.full_name,
            class_name: joined_class.map(|c| c.class_name).unwrap_or_default(),
        },
        None => LinkedStudentResponse {
            full_name: "No student linked".to_string(),
            class_name: String::new(),
        },
    };

    Ok(Json(response))
}

/// `GET /api/parent/years`
pub async fn years(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let rows = academic_year::Entity::find()
        .select_only()
        .column(academic_year::Column::YearId)
        .column(academic_year::Column::AcademicYearName)
        .order_by_desc(academic_year::Column::YearId)
        .into_model::<YearRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /api/parent/semesters/{year_id}`
pub async fn semesters(
    State(state): State<Arc<AppState>>,
    Path(year_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let rows = semester::Entity::find()
        .select_only()
        .column(semester::Column::SemesterId)
        .column(semester::Column::SemesterName)
        .filter(semester::Column::YearId.eq(year_id))
        .order_by_asc(semester::Column::SemesterId)
        .into_model::<SemesterRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /api/parent/scores/{year_id}/{semester_id}`
///
/// Per-subject rows plus a one-row summary (conduct and semester average,
/// taken from the latest score row of the period).
pub async fn scores(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path((year_id, semester_id)): Path<(i32, i32)>,
) -> ApiResult<impl IntoResponse> {
    let subjects = score::Entity::find()
        .join(JoinType::InnerJoin, score::Relation::Subject.def())
        .join(JoinType::InnerJoin, score::Relation::Student.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .filter(score::Column::YearId.eq(year_id))
        .filter(score::Column::SemesterId.eq(semester_id))
        .select_only()
        .column_as(
            Expr::col((subject::Entity, subject::Column::SubjectName)),
            "subject_name",
        )
        .column(score::Column::Scorehs1)
        .column(score::Column::Scorehs2)
        .column(score::Column::Scorehs3)
        .column(score::Column::ScoreTbm)
        .column(score::Column::TeacherComment)
        .order_by_asc(subject::Column::SubjectName)
        .into_model::<SubjectScoreRow>()
        .all(&state.db)
        .await?;

    let latest = score::Entity::find()
        .join(JoinType::InnerJoin, score::Relation::Student.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .filter(score::Column::YearId.eq(year_id))
        .filter(score::Column::SemesterId.eq(semester_id))
        .order_by_desc(score::Column::ScoreId)
        .one(&state.db)
        .await?;

    let summary = match latest {
        Some(row) => json!({ "Conduct": row.conduct, "FinalScore": row.final_score }),
        None => json!({ "Conduct": null, "FinalScore": null }),
    };

    Ok(Json(json!({ "subjects": subjects, "summary": summary })))
}

/// `GET /api/parent/teachers`
///
/// The homeroom teacher plus every subject teacher that has graded the
/// linked student, labelled with the subject they teach. Sorted by label
/// then name; siblings sharing a class yield one homeroom row.
pub async fn teachers(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let mut contacts = class::Entity::find()
        .join(JoinType::InnerJoin, class::Relation::Students.def())
        .join(JoinType::InnerJoin, class::Relation::HomeroomTeacher.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .filter(user::Column::Role.eq(2))
        .select_only()
        .column_as(Expr::col((user::Entity, user::Column::UserId)), "user_id")
        .column_as(Expr::col((user::Entity, user::Column::FullName)), "full_name")
        .column_as(Expr::value("Homeroom teacher"), "role_name")
        .distinct()
        .into_model::<TeacherContactRow>()
        .all(&state.db)
        .await?;

    let subject_teachers = score::Entity::find()
        .join(JoinType::InnerJoin, score::Relation::Student.def())
        .join(JoinType::InnerJoin, score::Relation::Subject.def())
        .join(JoinType::InnerJoin, subject::Relation::Teacher.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .filter(user::Column::Role.eq(2))
        .select_only()
        .column_as(Expr::col((user::Entity, user::Column::UserId)), "user_id")
        .column_as(Expr::col((user::Entity, user::Column::FullName)), "full_name")
        .column_as(
            Expr::col((subject::Entity, subject::Column::SubjectName)),
            "role_name",
        )
        .distinct()
        .into_model::<TeacherContactRow>()
        .all(&state.db)
        .await?;

    contacts.extend(subject_teachers);
    contacts.sort_by(|a, b| {
        (a.role_name.as_str(), a.full_name.as_str())
            .cmp(&(b.role_name.as_str(), b.full_name.as_str()))
    });

    Ok(Json(contacts))
}

/// `GET /api/parent/messages/{receiver_id}`
///
/// Both directions of the conversation, oldest first.
pub async fn conversation(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(peer_id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let rows = message::Entity::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(message::Column::SenderId.eq(caller.user_id))
                        .add(message::Column::ReceiverId.eq(peer_id)),
                )
                .add(
                    Condition::all()
                        .add(message::Column::SenderId.eq(peer_id))
                        .add(message::Column::ReceiverId.eq(caller.user_id)),
                ),
        )
        .order_by_asc(message::Column::SentTime)
        .into_model::<MessageRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `POST /api/parent/messages`
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let (receiver_id, contents) = match (request.receiver_id, request.contents) {
        (Some(r), Some(c)) if !c.is_empty() => (r, c),
        _ => {
            return Err(ApiError::BadRequest(
                "ReceiverID and Contents are required".to_string(),
            ))
        }
    };

    let model = message::ActiveModel {
        sender_id: Set(caller.user_id),
        receiver_id: Set(receiver_id),
        sent_time: Set(Utc::now()),
        contents: Set(contents),
        is_read: Set(false),
        ..Default::default()
    };

    model.insert(&state.db).await?;

    Ok(Json(json!({ "success": true })))
}

/// `GET /api/parent/timetable?monday=YYYY-MM-DD`
///
/// One week of lessons for the linked student's class, starting at the given
/// Monday. DayOfWeek is 1 = Sunday through 7 = Saturday.
pub async fn week_timetable(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<TimetableQuery>,
) -> ApiResult<impl IntoResponse> {
    let monday = query.monday.ok_or_else(|| {
        ApiError::BadRequest("monday query parameter is required".to_string())
    })?;
    let week_end = monday
        .checked_add_days(Days::new(7))
        .ok_or_else(|| ApiError::BadRequest("monday is out of range".to_string()))?;

    let rows = timetable::Entity::find()
        .join(JoinType::InnerJoin, timetable::Relation::Subject.def())
        .join(JoinType::LeftJoin, timetable::Relation::Teacher.def())
        .join(JoinType::InnerJoin, timetable::Relation::Class.def())
        .join(JoinType::InnerJoin, class::Relation::Students.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .filter(timetable::Column::LessonDate.gte(monday))
        .filter(timetable::Column::LessonDate.lt(week_end))
        .select_only()
        .column(timetable::Column::LessonDate)
        .column(timetable::Column::LessonSlot)
        .column_as(
            Expr::col((subject::Entity, subject::Column::SubjectName)),
            "subject_name",
        )
        .column_as(Expr::col((user::Entity, user::Column::FullName)), "teacher_name")
        .order_by_asc(timetable::Column::LessonDate)
        .order_by_asc(timetable::Column::LessonSlot)
        .into_model::<LessonRow>()
        .all(&state.db)
        .await?;

    let lessons: Vec<Lesson> = rows
        .into_iter()
        .map(|row| Lesson {
            day_of_week: row.lesson_date.weekday().num_days_from_sunday() + 1,
            lesson_slot: row.lesson_slot,
            lesson_date: row.lesson_date,
            subject_name: row.subject_name,
            teacher_name: row.teacher_name,
        })
        .collect();

    Ok(Json(json!({ "lessons": lessons })))
}

/// `POST /api/parent/requests`
///
/// Files a leave request for the caller's linked student. The homeroom
/// teacher is resolved at creation time and may be absent; the request is
/// created either way, status Pending, timestamped by the server.
pub async fn create_leave_request(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<CreateLeaveRequest>,
) -> ApiResult<impl IntoResponse> {
    let (reason, from_date, to_date) =
        match (request.reason, request.from_date, request.to_date) {
            (Some(r), Some(f), Some(t)) if !r.is_empty() => (r, f, t),
            _ => {
                return Err(ApiError::BadRequest(
                    "Reason, FromDate and ToDate are required".to_string(),
                ))
            }
        };

    let found = student::Entity::find()
        .filter(student::Column::ParentId.eq(caller.user_id))
        .find_also_related(class::Entity)
        .one(&state.db)
        .await?;

    let (pupil, joined_class) = found.ok_or_else(|| {
        ApiError::NotFound("No student associated with this parent".to_string())
    })?;

    let model = leave_request::ActiveModel {
        student_id: Set(pupil.student_id),
        parent_id: Set(caller.user_id),
        teacher_id: Set(joined_class.and_then(|c| c.homeroom_teacher_id)),
        created_at: Set(Utc::now()),
        reason: Set(reason),
        from_date: Set(from_date),
        to_date: Set(to_date),
        status: Set(leave_request::STATUS_PENDING.to_string()),
        ..Default::default()
    };

    let created = model.insert(&state.db).await?;

    tracing::info!(
        request_id = created.request_id,
        student_id = created.student_id,
        "leave request created"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Leave request submitted",
    })))
}

/// `GET /api/parent/requests`
pub async fn list_leave_requests(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let rows = leave_request::Entity::find()
        .join(JoinType::LeftJoin, leave_request::Relation::Teacher.def())
        .filter(leave_request::Column::ParentId.eq(caller.user_id))
        .select_only()
        .column(leave_request::Column::RequestId)
        .column(leave_request::Column::CreatedAt)
        .column(leave_request::Column::FromDate)
        .column(leave_request::Column::ToDate)
        .column(leave_request::Column::Reason)
        .column(leave_request::Column::Status)
        .column(leave_request::Column::TeacherNote)
        .column_as(Expr::col((user::Entity, user::Column::FullName)), "teacher_name")
        .order_by_desc(leave_request::Column::CreatedAt)
        .into_model::<LeaveRequestRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /api/parent/homeroom-teacher`
pub async fn homeroom_teacher(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let found = class::Entity::find()
        .join(JoinType::InnerJoin, class::Relation::Students.def())
        .join(JoinType::InnerJoin, class::Relation::HomeroomTeacher.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .select_only()
        .column_as(Expr::col((user::Entity, user::Column::FullName)), "full_name")
        .into_model::<NameRow>()
        .one(&state.db)
        .await?;

    let full_name = found
        .map(|row| row.full_name)
        .unwrap_or_else(|| "Homeroom teacher".to_string());

    Ok(Json(json!({ "FullName": full_name })))
}

/// `GET /api/parent/profile`
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let found = user::Entity::find()
        .filter(user::Column::UserId.eq(caller.user_id))
        .filter(user::Column::Role.eq(3))
        .select_only()
        .column(user::Column::UserId)
        .column(user::Column::Username)
        .column(user::Column::FullName)
        .column(user::Column::Email)
        .column(user::Column::Phone)
        .column(user::Column::Address)
        .column(user::Column::Gender)
        .into_model::<ParentProfileRow>()
        .one(&state.db)
        .await?;

    let body = match found {
        Some(row) => serde_json::to_value(row).map_err(|e| ApiError::Internal(e.to_string()))?,
        None => json!({}),
    };

    Ok(Json(body))
}

/// `PUT /api/parent/profile`
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    user::Entity::update_many()
        .col_expr(user::Column::FullName, Expr::value(request.full_name))
        .col_expr(user::Column::Email, Expr::value(request.email))
        .col_expr(user::Column::Phone, Expr::value(request.phone))
        .col_expr(user::Column::Address, Expr::value(request.address))
        .col_expr(user::Column::Gender, Expr::value(request.gender))
        .filter(user::Column::UserId.eq(caller.user_id))
        .filter(user::Column::Role.eq(3))
        .exec(&state.db)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// `GET /api/parent/children`
pub async fn children(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let rows = student::Entity::find()
        .join(JoinType::LeftJoin, student::Relation::Class.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .select_only()
        .column(student::Column::FullName)
        .column(student::Column::DateOfBirth)
        .column(student::Column::Gender)
        .column_as(Expr::col((class::Entity, class::Column::ClassName)), "class_name")
        .order_by_asc(student::Column::FullName)
        .into_model::<ChildRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /api/parent/attendance`
pub async fn attendance_history(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let rows = attendance::Entity::find()
        .join(JoinType::InnerJoin, attendance::Relation::Student.def())
        .filter(student::Column::ParentId.eq(caller.user_id))
        .select_only()
        .column(attendance::Column::Date)
        .column(attendance::Column::Status)
        .order_by_desc(attendance::Column::Date)
        .into_model::<AttendanceRow>()
        .all(&state.db)
        .await?;

    let entries: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|row| {
            let label = match row.status {
                1 => "Present",
                0 => "Absent (unexcused)",
                2 => "Late",
                3 => "Absent (excused)",
                _ => "Not recorded",
            };
            json!({ "Date": row.date, "Status": label })
        })
        .collect();

    Ok(Json(entries))
}

/// `GET /api/parent/notifications`
pub async fn notifications(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let rows = notification::Entity::find()
        .filter(notification::Column::SendWeb.eq(true))
        .select_only()
        .column(notification::Column::NotificationId)
        .column(notification::Column::Title)
        .column(notification::Column::Contents)
        .column(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::CreatedAt)
        .into_model::<NotificationRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}
