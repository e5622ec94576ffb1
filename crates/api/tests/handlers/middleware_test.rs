use axum::{http::StatusCode, response::IntoResponse};
use catalyst_api::middleware::error_handling::AppError;
use catalyst_core::errors::CatalystError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::test_utils::{TestContext, as_user};

#[rstest]
#[case(CatalystError::NotFound("entry".into()), StatusCode::NOT_FOUND)]
#[case(CatalystError::Validation("classId is required".into()), StatusCode::BAD_REQUEST)]
#[case(CatalystError::Authentication("Unauthorized".into()), StatusCode::UNAUTHORIZED)]
#[case(CatalystError::Authorization("Admin access required".into()), StatusCode::FORBIDDEN)]
#[case(CatalystError::Conflict("cell taken".into()), StatusCode::CONFLICT)]
#[case(CatalystError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: CatalystError, #[case] expected: StatusCode) {
    assert_eq!(AppError(error).into_response().status(), expected);
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let server = TestContext::new().server();

    let response = server.get("/api/profile").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "Authentication error: Unauthorized" }));
}

#[tokio::test]
async fn test_unknown_user_is_unauthorized() {
    let ctx = TestContext::new();
    let mut stranger = ctx.admin.clone();
    stranger.user_id = uuid::Uuid::new_v4();
    let server = ctx.server();

    let response = as_user(server.get("/api/profile"), &stranger).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_user_header_is_unauthorized() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/profile")
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_static("not-a-uuid"),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_echoes_session() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let server = ctx.server();

    let response = as_user(server.get("/api/profile"), &teacher).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["userId"], teacher.user_id.to_string());
    assert_eq!(body["role"], "teacher");
}

#[tokio::test]
async fn test_admin_routes_reject_teachers() {
    let ctx = TestContext::new();
    let teacher = ctx.teacher.clone();
    let server = ctx.server();

    let response = as_user(server.get("/api/admin/timetable/subjects"), &teacher).await;

    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({ "error": "Authorization error: Admin access required" }));
}

#[test_log::test(tokio::test)]
async fn test_database_errors_are_not_leaked() {
    let mut ctx = TestContext::new();
    let admin = ctx.admin.clone();
    ctx.store
        .expect_list_subjects()
        .returning(|_| Err(eyre::eyre!("connection refused on 10.0.0.3")));
    let server = ctx.server();

    let response = as_user(server.get("/api/admin/timetable/subjects"), &admin).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_health_needs_no_session() {
    let server = TestContext::new().server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}
