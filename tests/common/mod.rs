//! Shared helpers for the integration tests: an in-memory database, a fully
//! wired router and seed data covering all three account roles.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use schoolgate::auth::Role;
use schoolgate::entity::{
    academic_year, class, semester, student, subject, timetable, user,
};
use schoolgate::{build_router, AppConfig, AppState};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_ID: i32 = 10;
pub const TEACHER_ID: i32 = 20;
pub const PARENT_ID: i32 = 30;
pub const CLASS_ID: i32 = 40;
pub const STUDENT_ID: i32 = 50;
pub const SUBJECT_MATH: i32 = 60;
pub const SUBJECT_SCIENCE: i32 = 61;
pub const YEAR_ID: i32 = 1;
pub const SEMESTER_ID: i32 = 2;

/// Fresh app over an in-memory sqlite database with migrations applied.
///
/// The pool is capped at one connection so every request sees the same
/// in-memory database.
pub async fn test_app() -> (Router, Arc<AppState>) {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        jwt_secret: "integration-test-secret".to_string(),
        ..AppConfig::default()
    };

    let db = schoolgate::db::connect(&config)
        .await
        .expect("in-memory database");

    let state = Arc::new(AppState::new(config, db));
    (build_router(state.clone()), state)
}

/// Seed one admin, one teacher, one parent, a class with the teacher as
/// homeroom, a student linked to the parent, and two subjects.
pub async fn seed_school(state: &AppState) {
    user::ActiveModel {
        user_id: Set(ADMIN_ID),
        username: Set("admin".to_string()),
        password: Set("admin-pass".to_string()),
        full_name: Set("Site Admin".to_string()),
        email: Set(None),
        role: Set(1),
        phone: Set(None),
        address: Set(None),
        gender: Set(None),
    }
    .insert(&state.db)
    .await
    .expect("seed admin");

    user::ActiveModel {
        user_id: Set(TEACHER_ID),
        username: Set("gv.mai".to_string()),
        password: Set("teacher-pass".to_string()),
        full_name: Set("Mai Tran".to_string()),
        email: Set(Some("mai@example.edu".to_string())),
        role: Set(2),
        phone: Set(None),
        address: Set(None),
        gender: Set(None),
    }
    .insert(&state.db)
    .await
    .expect("seed teacher");

    user::ActiveModel {
        user_id: Set(PARENT_ID),
        username: Set("ph.binh".to_string()),
        password: Set("parent-pass".to_string()),
        full_name: Set("Binh Le".to_string()),
        email: Set(None),
        role: Set(3),
        phone: Set(None),
        address: Set(None),
        gender: Set(None),
    }
    .insert(&state.db)
    .await
    .expect("seed parent");

    academic_year::ActiveModel {
        year_id: Set(YEAR_ID),
        academic_year_name: Set("2025-2026".to_string()),
        start_date: Set(NaiveDate::from_ymd_opt(2025, 9, 1)),
    }
    .insert(&state.db)
    .await
    .expect("seed year");

    semester::ActiveModel {
        semester_id: Set(SEMESTER_ID),
        semester_name: Set("Semester 1".to_string()),
        year_id: Set(YEAR_ID),
    }
    .insert(&state.db)
    .await
    .expect("seed semester");

    class::ActiveModel {
        class_id: Set(CLASS_ID),
        class_name: Set("10A".to_string()),
        homeroom_teacher_id: Set(Some(TEACHER_ID)),
        year_id: Set(YEAR_ID),
    }
    .insert(&state.db)
    .await
    .expect("seed class");

    student::ActiveModel {
        student_id: Set(STUDENT_ID),
        full_name: Set("An Le".to_string()),
        class_id: Set(Some(CLASS_ID)),
        parent_id: Set(Some(PARENT_ID)),
        date_of_birth: Set(NaiveDate::from_ymd_opt(2010, 3, 14)),
        gender: Set(Some("F".to_string())),
    }
    .insert(&state.db)
    .await
    .expect("seed student");

    subject::ActiveModel {
        subject_id: Set(SUBJECT_MATH),
        subject_name: Set("Math".to_string()),
        teacher_id: Set(Some(TEACHER_ID)),
    }
    .insert(&state.db)
    .await
    .expect("seed subject");

    subject::ActiveModel {
        subject_id: Set(SUBJECT_SCIENCE),
        subject_name: Set("Science".to_string()),
        teacher_id: Set(Some(TEACHER_ID)),
    }
    .insert(&state.db)
    .await
    .expect("seed subject");
}

/// Add a timetable row; ids are assigned by the database.
pub async fn seed_lesson(
    state: &AppState,
    class_id: i32,
    subject_id: i32,
    teacher_id: i32,
    date: NaiveDate,
    slot: i32,
) {
    timetable::ActiveModel {
        class_id: Set(class_id),
        subject_id: Set(subject_id),
        teacher_id: Set(Some(teacher_id)),
        lesson_date: Set(date),
        lesson_slot: Set(slot),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .expect("seed lesson");
}

pub fn token_for(state: &AppState, user_id: i32, username: &str, role: Role) -> String {
    state
        .tokens
        .issue(user_id, username, role, "Test User")
        .expect("issue token")
}

pub async fn get(app: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).expect("request");
    send(app, request).await
}

pub async fn post_json(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: &Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
