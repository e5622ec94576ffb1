use axum::http::StatusCode;
use catalyst_core::models::{
    school::{
        Class, ClassAssignment, GradeLevel, ListAssignmentsResponse, ListClassesResponse,
        ListGradeLevelsResponse,
    },
    student::{ListStudentsResponse, Student, WellbeingStatus},
};
use chrono::Utc;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user, class};

fn student(first: &str, xp: i64, status: WellbeingStatus) -> Student {
    Student {
        id: Uuid::new_v4(),
        first_name: Some(first.to_string()),
        last_name: Some("Reed".to_string()),
        email: Some(format!("{}@school.edu", first.to_lowercase())),
        xp,
        level: 1,
        streak_days: 0,
        wellbeing_status: Some(status),
    }
}

fn roster() -> Vec<Student> {
    vec![
        student("Mia", 40, WellbeingStatus::Good),
        student("Leo", 90, WellbeingStatus::AtRisk),
        student("Ivy", 70, WellbeingStatus::Good),
    ]
}

#[tokio::test]
async fn test_students_are_filtered_and_sorted() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let class_id = Uuid::new_v4();
    ctx.store
        .expect_list_students()
        .with(eq(ctx.school_id), eq(Some(class_id)))
        .returning(|_, _| Ok(roster()));
    let server = ctx.server();

    let response = as_user(
        server
            .get("/api/teacher/students")
            .add_query_param("classId", class_id)
            .add_query_param("status", "good")
            .add_query_param("sortBy", "xp")
            .add_query_param("order", "desc"),
        &teacher,
    )
    .await;

    response.assert_status_ok();
    let names: Vec<String> = response
        .json::<ListStudentsResponse>()
        .students
        .iter()
        .map(Student::full_name)
        .collect();
    assert_eq!(names, vec!["Ivy Reed", "Mia Reed"]);
}

#[tokio::test]
async fn test_default_roster_is_sorted_by_name() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    ctx.store
        .expect_list_students()
        .with(eq(ctx.school_id), eq(None))
        .returning(|_, _| Ok(roster()));
    let server = ctx.server();

    let response = as_user(server.get("/api/teacher/students"), &teacher).await;

    let names: Vec<String> = response
        .json::<ListStudentsResponse>()
        .students
        .iter()
        .map(Student::full_name)
        .collect();
    assert_eq!(names, vec!["Ivy Reed", "Leo Reed", "Mia Reed"]);
}

#[rstest]
#[case("sortBy", "height")]
#[case("order", "sideways")]
#[case("status", "sleepy")]
#[tokio::test]
async fn test_bad_roster_query_is_rejected(#[case] key: &str, #[case] value: &str) {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    ctx.store.expect_list_students().never();
    let server = ctx.server();

    let response = as_user(
        server.get("/api/teacher/students").add_query_param(key, value),
        &teacher,
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_students_cannot_read_the_roster() {
    let ctx = TestContext::new();
    let student = ctx.student.clone();
    let server = ctx.server();

    let response = as_user(server.get("/api/teacher/students"), &student).await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_classes_by_grade() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let classes = vec![class("Grade 7A")];
    let expected = classes.clone();
    ctx.store
        .expect_list_classes_by_grade()
        .with(eq(ctx.school_id), eq("7".to_string()))
        .returning(move |_, _| Ok(classes.clone()));
    let server = ctx.server();

    let response = as_user(server.get("/api/teacher/classes/7"), &teacher).await;

    response.assert_status_ok();
    assert_eq!(response.json::<ListClassesResponse>().classes, expected);
}

fn assignment(class: &Class, subject: &str) -> ClassAssignment {
    ClassAssignment {
        id: Uuid::new_v4(),
        class: class.clone(),
        subject: subject.to_string(),
        assigned_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_grade_levels() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let grades = vec![
        GradeLevel { grade_level: "7".to_string(), class_count: 2 },
        GradeLevel { grade_level: "10".to_string(), class_count: 1 },
    ];
    let expected = grades.clone();
    ctx.store
        .expect_list_grade_levels()
        .with(eq(ctx.school_id))
        .returning(move |_| Ok(grades.clone()));
    let server = ctx.server();

    let response = as_user(server.get("/api/teacher/grade-levels"), &teacher).await;

    response.assert_status_ok();
    assert_eq!(response.json::<ListGradeLevelsResponse>().grade_levels, expected);
}

#[tokio::test]
async fn test_list_own_assignments() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let stored = vec![assignment(&class("Grade 7A"), "Science")];
    let expected = stored.clone();
    ctx.store
        .expect_list_class_assignments()
        .with(eq(ctx.school_id), eq(teacher.user_id))
        .returning(move |_, _| Ok(stored.clone()));
    let server = ctx.server();

    let response = as_user(server.get("/api/teacher/class-assignments"), &teacher).await;

    response.assert_status_ok();
    assert_eq!(response.json::<ListAssignmentsResponse>().assignments, expected);
}

#[tokio::test]
async fn test_assign_classes_replaces_the_set() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let seven_a = class("Grade 7A");
    let seven_b = class("Grade 7B");
    let (a_id, b_id, teacher_id) = (seven_a.id, seven_b.id, teacher.user_id);
    let known = vec![seven_a.clone(), seven_b.clone()];
    ctx.store.expect_get_class().returning(move |_, class_id| {
        Ok(known.iter().find(|c| c.id == class_id).cloned())
    });
    ctx.store
        .expect_replace_class_assignments()
        .withf(move |_, owner, class_ids, subject| {
            *owner == teacher_id && *class_ids == vec![a_id, b_id] && subject == "General"
        })
        .times(1)
        .returning(|_, _, ids, _| Ok(ids.len() as u64));
    let stored = vec![assignment(&seven_a, "General"), assignment(&seven_b, "General")];
    let expected = stored.clone();
    ctx.store
        .expect_list_class_assignments()
        .returning(move |_, _| Ok(stored.clone()));
    let server = ctx.server();

    let response = as_user(
        server
            .post("/api/teacher/class-assignments")
            .json(&json!({ "classIds": [a_id, b_id, a_id], "subject": "  " })),
        &teacher,
    )
    .await;

    response.assert_status_ok();
    assert_eq!(response.json::<ListAssignmentsResponse>().assignments, expected);
}

#[tokio::test]
async fn test_assign_without_classes_is_rejected() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    ctx.store.expect_replace_class_assignments().never();
    let server = ctx.server();

    let response = as_user(
        server
            .post("/api/teacher/class-assignments")
            .json(&json!({ "classIds": [] })),
        &teacher,
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Validation error: Select at least one class" }));
}

#[tokio::test]
async fn test_assign_foreign_class_is_not_found() {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    ctx.store.expect_get_class().returning(|_, _| Ok(None));
    ctx.store.expect_replace_class_assignments().never();
    let server = ctx.server();

    let response = as_user(
        server
            .post("/api/teacher/class-assignments")
            .json(&json!({ "classIds": [Uuid::new_v4()], "subject": "Maths" })),
        &teacher,
    )
    .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[rstest]
#[case(true, StatusCode::OK)]
#[case(false, StatusCode::NOT_FOUND)]
#[tokio::test]
async fn test_unassign_class(#[case] was_assigned: bool, #[case] expected: StatusCode) {
    let mut ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let class_id = Uuid::new_v4();
    ctx.store
        .expect_delete_class_assignment()
        .with(eq(ctx.school_id), eq(teacher.user_id), eq(class_id))
        .returning(move |_, _, _| Ok(was_assigned));
    let server = ctx.server();

    let response = as_user(
        server
            .delete("/api/teacher/class-assignments")
            .add_query_param("classId", class_id),
        &teacher,
    )
    .await;

    response.assert_status(expected);
}

#[tokio::test]
async fn test_unassign_requires_class_id() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let server = ctx.server();

    let response = as_user(server.delete("/api/teacher/class-assignments"), &teacher).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Validation error: classId is required" }));
}

#[tokio::test]
async fn test_students_cannot_manage_assignments() {
    let mut ctx = TestContext::new();
    let student = ctx.student.clone();
    ctx.store.expect_list_class_assignments().never();
    let server = ctx.server();

    let response = as_user(server.get("/api/teacher/class-assignments"), &student).await;
    response.assert_status(StatusCode::FORBIDDEN);
}
