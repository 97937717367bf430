//! Teacher surface: profile, quick stats, schedule, class rosters and the
//! score upsert.

use crate::auth::AuthUser;
use crate::entity::{class, leave_request, score, student, subject, timetable};
use crate::error::{ApiError, ApiResult};
use crate::projector::{group_class_subjects, ClassSubjectRow};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "HomeroomClass")]
    pub homeroom_class: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(rename = "totalClasses")]
    pub total_classes: u64,
    #[serde(rename = "totalStudents")]
    pub total_students: u64,
    #[serde(rename = "pendingLeaves")]
    pub pending_leaves: u64,
    #[serde(rename = "todayLessons")]
    pub today_lessons: u64,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct ScheduleRow {
    #[serde(rename = "LessonSlot")]
    pub lesson_slot: i32,
    #[serde(rename = "LessonDate")]
    pub lesson_date: chrono::NaiveDate,
    #[serde(rename = "ClassName")]
    pub class_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoresQuery {
    #[serde(rename = "classID", default)]
    pub class_id: Option<i32>,
    #[serde(rename = "subjectID", default)]
    pub subject_id: Option<i32>,
    #[serde(rename = "semesterID", default)]
    pub semester_id: Option<i32>,
    #[serde(rename = "yearID", default)]
    pub year_id: Option<i32>,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct RosterRow {
    #[serde(rename = "StudentID")]
    pub student_id: i32,
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Scorehs1")]
    pub scorehs1: Option<f64>,
    #[serde(rename = "Scorehs2")]
    pub scorehs2: Option<f64>,
    #[serde(rename = "Scorehs3")]
    pub scorehs3: Option<f64>,
    #[serde(rename = "ScoreTBM")]
    pub score_tbm: Option<f64>,
    #[serde(rename = "Conduct")]
    pub conduct: Option<String>,
    #[serde(rename = "TeacherComment")]
    pub teacher_comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveScoreRequest {
    #[serde(rename = "StudentID", default)]
    pub student_id: Option<i32>,
    #[serde(rename = "SubjectID", default)]
    pub subject_id: Option<i32>,
    #[serde(rename = "SemesterID", default)]
    pub semester_id: Option<i32>,
    #[serde(rename = "YearID", default)]
    pub year_id: Option<i32>,
    #[serde(rename = "Scorehs1", default)]
    pub scorehs1: Option<f64>,
    #[serde(rename = "Scorehs2", default)]
    pub scorehs2: Option<f64>,
    #[serde(rename = "Scorehs3", default)]
    pub scorehs3: Option<f64>,
    #[serde(rename = "Conduct", default)]
    pub conduct: Option<String>,
    #[serde(rename = "TeacherComment", default)]
    pub teacher_comment: Option<String>,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct AcademicYearRow {
    #[serde(rename = "YearID")]
    pub year_id: i32,
    #[serde(rename = "AcademicYearName")]
    pub academic_year_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TeachingClassesQuery {
    #[serde(rename = "yearID", default)]
    pub year_id: Option<i32>,
}

#[derive(Debug, FromQueryResult)]
struct TeachingRow {
    class_id: i32,
    class_name: String,
    subject_id: i32,
    subject_name: String,
}

/// `GET /api/teacher/profile`
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let homeroom = class::Entity::find()
        .filter(class::Column::HomeroomTeacherId.eq(caller.user_id))
        .one(&state.db)
        .await?;

    Ok(Json(ProfileResponse {
        full_name: caller.full_name,
        homeroom_class: homeroom.map(|c| c.class_name),
    }))
}

/// `GET /api/teacher/stats`
///
/// Four independent counting queries; the source bundled them into one
/// statement of scalar subselects, the shape of the answer is identical.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let teacher_id = caller.user_id;

    let total_classes = timetable::Entity::find()
        .filter(timetable::Column::TeacherId.eq(teacher_id))
        .select_only()
        .column(timetable::Column::ClassId)
        .distinct()
        .count(&state.db)
        .await?;

    let total_students = student::Entity::find()
        .join(JoinType::InnerJoin, student::Relation::Class.def())
        .join(JoinType::InnerJoin, class::Relation::Timetable.def())
        .filter(timetable::Column::TeacherId.eq(teacher_id))
        .select_only()
        .column(student::Column::StudentId)
        .distinct()
        .count(&state.db)
        .await?;

    let pending_leaves = leave_request::Entity::find()
        .join(JoinType::InnerJoin, leave_request::Relation::Student.def())
        .join(JoinType::InnerJoin, student::Relation::Class.def())
        .filter(class::Column::HomeroomTeacherId.eq(teacher_id))
        .filter(leave_request::Column::Status.eq(leave_request::STATUS_PENDING))
        .count(&state.db)
        .await?;

    let today_lessons = timetable::Entity::find()
        .filter(timetable::Column::TeacherId.eq(teacher_id))
        .filter(timetable::Column::LessonDate.eq(Utc::now().date_naive()))
        .count(&state.db)
        .await?;

    Ok(Json(StatsResponse {
        total_classes,
        total_students,
        pending_leaves,
        today_lessons,
    }))
}

/// `GET /api/teacher/today-schedule`
pub async fn today_schedule(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let rows = timetable::Entity::find()
        .join(JoinType::InnerJoin, timetable::Relation::Class.def())
        .filter(timetable::Column::TeacherId.eq(caller.user_id))
        .filter(timetable::Column::LessonDate.eq(Utc::now().date_naive()))
        .select_only()
        .column(timetable::Column::LessonSlot)
        .column(timetable::Column::LessonDate)
        .column_as(Expr::col((class::Entity, class::Column::ClassName)), "class_name")
        .order_by_asc(timetable::Column::LessonSlot)
        .into_model::<ScheduleRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /api/teacher/scores?classID=&subjectID=&semesterID=&yearID=`
///
/// Roster of the class with the score tuple left-joined in; students without
/// a score row for the tuple still appear, score fields null.
pub async fn class_scores(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScoresQuery>,
) -> ApiResult<impl IntoResponse> {
    let (class_id, subject_id, semester_id, year_id) = match (
        query.class_id,
        query.subject_id,
        query.semester_id,
        query.year_id,
    ) {
        (Some(c), Some(su), Some(se), Some(y)) => (c, su, se, y),
        _ => {
            return Err(ApiError::BadRequest(
                "classID, subjectID, semesterID and yearID are required".to_string(),
            ))
        }
    };

    let rows = student::Entity::find()
        .join(JoinType::InnerJoin, student::Relation::Class.def())
        .join(
            JoinType::LeftJoin,
            student::Relation::Scores.def().on_condition(move |_left, right| {
                Condition::all()
                    .add(Expr::col((right.clone(), score::Column::SubjectId)).eq(subject_id))
                    .add(Expr::col((right.clone(), score::Column::SemesterId)).eq(semester_id))
                    .add(Expr::col((right, score::Column::YearId)).eq(year_id))
            }),
        )
        .filter(class::Column::ClassId.eq(class_id))
        .filter(class::Column::YearId.eq(year_id))
        .select_only()
        .column(student::Column::StudentId)
        .column(student::Column::FullName)
        .column_as(Expr::col((score::Entity, score::Column::Scorehs1)), "scorehs1")
        .column_as(Expr::col((score::Entity, score::Column::Scorehs2)), "scorehs2")
        .column_as(Expr::col((score::Entity, score::Column::Scorehs3)), "scorehs3")
        .column_as(Expr::col((score::Entity, score::Column::ScoreTbm)), "score_tbm")
        .column_as(Expr::col((score::Entity, score::Column::Conduct)), "conduct")
        .column_as(
            Expr::col((score::Entity, score::Column::TeacherComment)),
            "teacher_comment",
        )
        .order_by_asc(student::Column::FullName)
        .into_model::<RosterRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `POST /api/teacher/save-score`
///
/// Atomic insert-or-update keyed on (student, subject, semester, year).
/// A single conditional write, not an exists-check followed by an insert:
/// two concurrent saves for the same tuple must end up as one row, the
/// later writer winning. TeacherID always comes from the verified token.
pub async fn save_score(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<SaveScoreRequest>,
) -> ApiResult<impl IntoResponse> {
    let (student_id, subject_id, semester_id, year_id) = match (
        request.student_id,
        request.subject_id,
        request.semester_id,
        request.year_id,
    ) {
        (Some(st), Some(su), Some(se), Some(y)) => (st, su, se, y),
        _ => {
            return Err(ApiError::BadRequest(
                "StudentID, SubjectID, SemesterID and YearID are required".to_string(),
            ))
        }
    };

    let model = score::ActiveModel {
        student_id: Set(student_id),
        subject_id: Set(subject_id),
        semester_id: Set(semester_id),
        year_id: Set(year_id),
        scorehs1: Set(request.scorehs1),
        scorehs2: Set(request.scorehs2),
        scorehs3: Set(request.scorehs3),
        conduct: Set(request.conduct),
        teacher_comment: Set(request.teacher_comment),
        teacher_id: Set(Some(caller.user_id)),
        // score_tbm / final_score are maintained elsewhere; never written here
        ..Default::default()
    };

    score::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                score::Column::StudentId,
                score::Column::SubjectId,
                score::Column::SemesterId,
                score::Column::YearId,
            ])
            .update_columns([
                score::Column::Scorehs1,
                score::Column::Scorehs2,
                score::Column::Scorehs3,
                score::Column::Conduct,
                score::Column::TeacherComment,
                score::Column::TeacherId,
            ])
            .to_owned(),
        )
        .exec(&state.db)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// `GET /api/teacher/academic-years`
pub async fn academic_years(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    use crate::entity::academic_year;

    let rows = academic_year::Entity::find()
        .select_only()
        .column(academic_year::Column::YearId)
        .column(academic_year::Column::AcademicYearName)
        .order_by_desc(academic_year::Column::StartDate)
        .into_model::<AcademicYearRow>()
        .all(&state.db)
        .await?;

    Ok(Json(rows))
}

/// `GET /api/teacher/teaching-classes?yearID=`
///
/// Flat timetable × classes × subjects join for the caller, grouped into
/// one entry per class (see `projector`).
pub async fn teaching_classes(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<TeachingClassesQuery>,
) -> ApiResult<impl IntoResponse> {
    let mut select = timetable::Entity::find()
        .join(JoinType::InnerJoin, timetable::Relation::Class.def())
        .join(JoinType::InnerJoin, timetable::Relation::Subject.def())
        .filter(timetable::Column::TeacherId.eq(caller.user_id));

    if let Some(year_id) = query.year_id {
        select = select.filter(class::Column::YearId.eq(year_id));
    }

    let rows = select
        .select_only()
        .column_as(Expr::col((class::Entity, class::Column::ClassId)), "class_id")
        .column_as(Expr::col((class::Entity, class::Column::ClassName)), "class_name")
        .column_as(
            Expr::col((subject::Entity, subject::Column::SubjectId)),
            "subject_id",
        )
        .column_as(
            Expr::col((subject::Entity, subject::Column::SubjectName)),
            "subject_name",
        )
        .distinct()
        .order_by_asc(class::Column::ClassName)
        .into_model::<TeachingRow>()
        .all(&state.db)
        .await?;

    let groups = group_class_subjects(rows.into_iter().map(|r| ClassSubjectRow {
        class_id: r.class_id,
        class_name: r.class_name,
        subject_id: r.subject_id,
        subject_name: r.subject_name,
    }));

    Ok(Json(groups))
}
