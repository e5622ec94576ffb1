use axum::http::StatusCode;
use catalyst_core::models::school::{ListClassesResponse, ListUsersResponse, Role, UserRecord};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user, class};

fn record(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        first_name: first.map(str::to_string),
        last_name: last.map(str::to_string),
        name: None,
        email: email.map(str::to_string),
        subjects: vec![],
    }
}

#[tokio::test]
async fn test_list_teachers_derives_display_names() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store
        .expect_list_users()
        .with(eq(ctx.school_id), eq(Role::Teacher), eq(Some(50)))
        .times(1)
        .returning(|_, _, _| {
            Ok(vec![
                record(Some("Ada"), Some("Lovelace"), Some("ada@school.edu")),
                record(None, None, Some("grace.hopper@school.edu")),
                record(None, None, None),
            ])
        });
    let server = ctx.server();

    let response = as_user(
        server
            .get("/api/admin/users")
            .add_query_param("role", "teacher")
            .add_query_param("limit", 50),
        &admin,
    )
    .await;

    response.assert_status_ok();
    let users = response.json::<ListUsersResponse>().users;
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper", "Teacher 3"]);
    assert_eq!(users[2].email, "No email provided");
}

#[tokio::test]
async fn test_other_school_is_forbidden() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store.expect_list_users().never();
    ctx.store.expect_list_classes().never();
    let server = ctx.server();

    let users = as_user(
        server
            .get("/api/admin/users")
            .add_query_param("schoolId", Uuid::new_v4()),
        &admin,
    )
    .await;
    users.assert_status(StatusCode::FORBIDDEN);

    let classes = as_user(server.post("/api/admin/classes"), &admin)
        .json(&json!({ "schoolId": Uuid::new_v4() }))
        .await;
    classes.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let server = ctx.server();

    let response = as_user(
        server.get("/api/admin/users").add_query_param("role", "janitor"),
        &admin,
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_limit_is_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let server = ctx.server();

    let response = as_user(
        server.get("/api/admin/users").add_query_param("limit", -1),
        &admin,
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_classes_of_own_school() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    let school_id = ctx.school_id;
    let classes = vec![class("Grade 7A"), class("Grade 7B")];
    let expected = classes.clone();
    ctx.store
        .expect_list_classes()
        .with(eq(school_id))
        .returning(move |_| Ok(classes.clone()));
    let server = ctx.server();

    let response = as_user(server.post("/api/admin/classes"), &admin)
        .json(&json!({ "schoolId": school_id }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<ListClassesResponse>().classes, expected);
}
