//! Read-side endpoints: rosters, grouped teaching classes, parent dashboard.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::*;
use schoolgate::auth::Role;
use schoolgate::entity::{attendance, class, student, subject};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

#[tokio::test]
async fn teaching_classes_groups_subjects_per_class() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    class::ActiveModel {
        class_id: Set(41),
        class_name: Set("10B".to_string()),
        homeroom_teacher_id: Set(None),
        year_id: Set(YEAR_ID),
    }
    .insert(&state.db)
    .await
    .unwrap();

    let day = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
    seed_lesson(&state, CLASS_ID, SUBJECT_MATH, TEACHER_ID, day, 1).await;
    seed_lesson(&state, CLASS_ID, SUBJECT_SCIENCE, TEACHER_ID, day, 2).await;
    // repeat lesson, must not duplicate the subject in the group
    seed_lesson(&state, CLASS_ID, SUBJECT_MATH, TEACHER_ID, day.succ_opt().unwrap(), 1).await;
    seed_lesson(&state, 41, SUBJECT_MATH, TEACHER_ID, day, 3).await;

    let token = token_for(&state, TEACHER_ID, "gv.mai", Role::Teacher);
    let (status, body) = get(&app, "/api/teacher/teaching-classes", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0]["ClassName"], "10A");
    let subjects = groups[0]["Subjects"].as_array().unwrap();
    assert_eq!(subjects.len(), 2);
    let names: Vec<&str> = subjects
        .iter()
        .map(|s| s["SubjectName"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Math"));
    assert!(names.contains(&"Science"));

    assert_eq!(groups[1]["ClassName"], "10B");
    assert_eq!(groups[1]["Subjects"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn class_roster_lists_students_without_scores() {
    let (app, state) = test_app().await;
    seed_school(&state).await;
    let token = token_for(&state, TEACHER_ID, "gv.mai", Role::Teacher);

    let path = format!(
        "/api/teacher/scores?classID={CLASS_ID}&subjectID={SUBJECT_MATH}&semesterID={SEMESTER_ID}&yearID={YEAR_ID}"
    );
    let (status, body) = get(&app, &path, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["StudentID"], STUDENT_ID);
    assert_eq!(rows[0]["Scorehs1"], serde_json::Value::Null);
}

#[tokio::test]
async fn class_roster_requires_all_query_params() {
    let (app, state) = test_app().await;
    seed_school(&state).await;
    let token = token_for(&state, TEACHER_ID, "gv.mai", Role::Teacher);

    let (status, body) =
        get(&app, "/api/teacher/scores?classID=1&subjectID=2", Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn parent_scores_returns_subjects_and_summary() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    let teacher_token = token_for(&state, TEACHER_ID, "gv.mai", Role::Teacher);
    let (status, _) = post_json(
        &app,
        "/api/teacher/save-score",
        Some(&teacher_token),
        &json!({
            "StudentID": STUDENT_ID,
            "SubjectID": SUBJECT_MATH,
            "SemesterID": SEMESTER_ID,
            "YearID": YEAR_ID,
            "Scorehs1": 8.0,
            "Conduct": "Good"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);
    let path = format!("/api/parent/scores/{YEAR_ID}/{SEMESTER_ID}");
    let (status, body) = get(&app, &path, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let subjects = body["subjects"].as_array().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0]["SubjectName"], "Math");
    assert_eq!(subjects[0]["Scorehs1"], 8.0);
    assert_eq!(body["summary"]["Conduct"], "Good");
}

#[tokio::test]
async fn parent_scores_empty_period_has_null_summary() {
    let (app, state) = test_app().await;
    seed_school(&state).await;
    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);

    let path = format!("/api/parent/scores/{YEAR_ID}/{SEMESTER_ID}");
    let (status, body) = get(&app, &path, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["subjects"].as_array().unwrap().is_empty());
    assert_eq!(body["summary"]["Conduct"], serde_json::Value::Null);
    assert_eq!(body["summary"]["FinalScore"], serde_json::Value::Null);
}

#[tokio::test]
async fn linked_student_placeholder_when_none() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    student::Entity::delete_by_id(STUDENT_ID)
        .exec(&state.db)
        .await
        .unwrap();

    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);
    let (status, body) = get(&app, "/api/parent/student", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["FullName"], "No student linked");
    assert_eq!(body["ClassName"], "");
}

#[tokio::test]
async fn linked_student_includes_class_name() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);
    let (status, body) = get(&app, "/api/parent/student", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["FullName"], "An Le");
    assert_eq!(body["ClassName"], "10A");
}

#[tokio::test]
async fn week_timetable_requires_monday_and_maps_weekdays() {
    let (app, state) = test_app().await;
    seed_school(&state).await;
    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);

    let (status, _) = get(&app, "/api/parent/timetable", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 2026-09-07 is a Monday
    let monday = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
    seed_lesson(&state, CLASS_ID, SUBJECT_MATH, TEACHER_ID, monday, 1).await;
    // outside the window, must not appear
    let next_monday = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
    seed_lesson(&state, CLASS_ID, SUBJECT_MATH, TEACHER_ID, next_monday, 1).await;

    let (status, body) = get(&app, "/api/parent/timetable?monday=2026-09-07", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let lessons = body["lessons"].as_array().unwrap();
    assert_eq!(lessons.len(), 1);
    // Monday is day 2 in the 1 = Sunday convention
    assert_eq!(lessons[0]["DayOfWeek"], 2);
    assert_eq!(lessons[0]["SubjectName"], "Math");
    assert_eq!(lessons[0]["TeacherName"], "Mai Tran");
}

#[tokio::test]
async fn attendance_history_uses_status_labels() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    for (day, status_code) in [(1, 1), (2, 0), (3, 2), (4, 3)] {
        attendance::ActiveModel {
            student_id: Set(STUDENT_ID),
            date: Set(NaiveDate::from_ymd_opt(2026, 9, day).unwrap()),
            status: Set(status_code),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .unwrap();
    }

    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);
    let (status, body) = get(&app, "/api/parent/attendance", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    // newest first
    assert_eq!(rows[0]["Status"], "Absent (excused)");
    assert_eq!(rows[3]["Status"], "Present");
}

#[tokio::test]
async fn parent_teachers_lists_homeroom_and_subject_teachers() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    let teacher_token = token_for(&state, TEACHER_ID, "gv.mai", Role::Teacher);
    let (status, _) = post_json(
        &app,
        "/api/teacher/save-score",
        Some(&teacher_token),
        &json!({
            "StudentID": STUDENT_ID,
            "SubjectID": SUBJECT_MATH,
            "SemesterID": SEMESTER_ID,
            "YearID": YEAR_ID,
            "Scorehs1": 8.0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);
    let (status, body) = get(&app, "/api/parent/teachers", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let contacts = body.as_array().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0]["RoleName"], "Homeroom teacher");
    assert_eq!(contacts[1]["RoleName"], "Math");
    assert_eq!(contacts[1]["UserID"], TEACHER_ID);
}

#[tokio::test]
async fn parent_profile_includes_identity() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);
    let (status, body) = get(&app, "/api/parent/profile", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["UserID"], PARENT_ID);
    assert_eq!(body["Username"], "ph.binh");
    assert_eq!(body["FullName"], "Binh Le");
    assert!(body.get("Password").is_none());
}

#[tokio::test]
async fn parent_teachers_dedupes_homeroom_and_sorts_by_label() {
    let (app, state) = test_app().await;
    seed_school(&state).await;

    // sibling in the same class must not duplicate the homeroom row
    student::ActiveModel {
        student_id: Set(51),
        full_name: Set("Bao Le".to_string()),
        class_id: Set(Some(CLASS_ID)),
        parent_id: Set(Some(PARENT_ID)),
        date_of_birth: Set(None),
        gender: Set(Some("M".to_string())),
    }
    .insert(&state.db)
    .await
    .unwrap();

    subject::ActiveModel {
        subject_id: Set(62),
        subject_name: Set("Art".to_string()),
        teacher_id: Set(Some(TEACHER_ID)),
    }
    .insert(&state.db)
    .await
    .unwrap();

    let teacher_token = token_for(&state, TEACHER_ID, "gv.mai", Role::Teacher);
    for (student_id, subject_id) in [(STUDENT_ID, SUBJECT_MATH), (51, 62)] {
        let (status, _) = post_json(
            &app,
            "/api/teacher/save-score",
            Some(&teacher_token),
            &json!({
                "StudentID": student_id,
                "SubjectID": subject_id,
                "SemesterID": SEMESTER_ID,
                "YearID": YEAR_ID,
                "Scorehs1": 7.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);
    let (status, body) = get(&app, "/api/parent/teachers", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["RoleName"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Art", "Homeroom teacher", "Math"]);
}

#[tokio::test]
async fn messaging_round_trip() {
    let (app, state) = test_app().await;
    seed_school(&state).await;
    let token = token_for(&state, PARENT_ID, "ph.binh", Role::Parent);

    let (status, body) = post_json(
        &app,
        "/api/parent/messages",
        Some(&token),
        &json!({ "ReceiverID": TEACHER_ID, "Contents": "hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let path = format!("/api/parent/messages/{TEACHER_ID}");
    let (status, body) = get(&app, &path, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["SenderID"], PARENT_ID);
    assert_eq!(rows[0]["ReceiverID"], TEACHER_ID);
    assert_eq!(rows[0]["Contents"], "hello");
}
