use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use catalyst_core::models::school::{ListClassesRequest, ListClassesResponse, ListUsersResponse, Role};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::Session, error_handling::AppError},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub school_id: Option<Uuid>,
    pub role: Option<String>,
    /// Negative values fail to parse and are rejected with 400.
    pub limit: Option<u32>,
}

/// Users of one role (teachers by default) with display names filled in.
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    session: Session,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<ListUsersResponse>, AppError> {
    let Query(query) = query?;
    session.require_admin()?;
    session.check_school(query.school_id)?;

    let role = match query.role.as_deref() {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::Teacher,
    };

    let users = state
        .store
        .list_users(session.school_id(), role, query.limit.map(i64::from))
        .await?
        .into_iter()
        .enumerate()
        .map(|(position, record)| record.into_teacher(position))
        .collect();

    Ok(Json(ListUsersResponse { users }))
}

pub async fn list_classes(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<ListClassesRequest>, JsonRejection>,
) -> Result<Json<ListClassesResponse>, AppError> {
    let Json(payload) = payload?;
    session.require_admin()?;
    session.check_school(Some(payload.school_id))?;

    let classes = state.store.list_classes(session.school_id()).await?;
    Ok(Json(ListClassesResponse { classes }))
}
