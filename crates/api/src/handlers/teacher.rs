use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use catalyst_core::{
    errors::CatalystError,
    models::{
        school::{
            AssignClassesRequest, DEFAULT_ASSIGNMENT_SUBJECT, ListAssignmentsResponse, ListClassesResponse,
            ListGradeLevelsResponse,
        },
        student::ListStudentsResponse,
        timetable::SuccessResponse,
    },
    roster::{RosterQuery, filter_and_sort},
};
use serde::Deserialize;
use std::{collections::HashSet, sync::Arc};
use tracing::info;
use uuid::Uuid;

use super::class_in_school;
use crate::{
    ApiState,
    middleware::{auth::Session, error_handling::AppError},
};

pub async fn classes_by_grade(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Path(grade_level): Path<String>,
) -> Result<Json<ListClassesResponse>, AppError> {
    session.require_staff()?;

    let classes = state
        .store
        .list_classes_by_grade(session.school_id(), grade_level)
        .await?;

    Ok(Json(ListClassesResponse { classes }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentsQuery {
    pub class_id: Option<Uuid>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl StudentsQuery {
    fn roster_query(&self) -> Result<RosterQuery, AppError> {
        let mut query = RosterQuery {
            search: self.search.clone().unwrap_or_default(),
            ..Default::default()
        };
        if let Some(status) = &self.status {
            query.status = status.parse()?;
        }
        if let Some(sort_by) = &self.sort_by {
            query.sort_by = sort_by.parse()?;
        }
        if let Some(order) = &self.order {
            query.order = order.parse()?;
        }
        Ok(query)
    }
}

/// The roster of a class (or the whole school), filtered and sorted.
pub async fn list_students(
    State(state): State<Arc<ApiState>>,
    session: Session,
    query: Result<Query<StudentsQuery>, QueryRejection>,
) -> Result<Json<ListStudentsResponse>, AppError> {
    let Query(query) = query?;
    session.require_staff()?;
    let roster_query = query.roster_query()?;

    let students = state
        .store
        .list_students(session.school_id(), query.class_id)
        .await?;

    Ok(Json(ListStudentsResponse {
        students: filter_and_sort(&students, &roster_query),
    }))
}

pub async fn grade_levels(
    State(state): State<Arc<ApiState>>,
    session: Session,
) -> Result<Json<ListGradeLevelsResponse>, AppError> {
    session.require_staff()?;

    let grade_levels = state.store.list_grade_levels(session.school_id()).await?;
    Ok(Json(ListGradeLevelsResponse { grade_levels }))
}

/// The classes the caller teaches.
pub async fn list_assignments(
    State(state): State<Arc<ApiState>>,
    session: Session,
) -> Result<Json<ListAssignmentsResponse>, AppError> {
    session.require_staff()?;

    let assignments = state
        .store
        .list_class_assignments(session.school_id(), session.user_id())
        .await?;

    Ok(Json(ListAssignmentsResponse { assignments }))
}

/// Replaces the caller's assignments and returns the stored set.
pub async fn assign_classes(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<AssignClassesRequest>, JsonRejection>,
) -> Result<Json<ListAssignmentsResponse>, AppError> {
    let Json(payload) = payload?;
    session.require_staff()?;

    let mut seen = HashSet::new();
    let class_ids: Vec<Uuid> = payload
        .class_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    if class_ids.is_empty() {
        return Err(CatalystError::Validation("Select at least one class".into()).into());
    }

    for class_id in &class_ids {
        class_in_school(&state, &session, *class_id).await?;
    }

    let subject = match payload.subject.trim() {
        "" => DEFAULT_ASSIGNMENT_SUBJECT.to_string(),
        subject => subject.to_string(),
    };

    let stored = state
        .store
        .replace_class_assignments(session.school_id(), session.user_id(), class_ids, subject)
        .await?;
    info!("Teacher {} assigned to {} classes", session.user_id(), stored);

    let assignments = state
        .store
        .list_class_assignments(session.school_id(), session.user_id())
        .await?;

    Ok(Json(ListAssignmentsResponse { assignments }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignQuery {
    pub class_id: Option<Uuid>,
}

pub async fn unassign_class(
    State(state): State<Arc<ApiState>>,
    session: Session,
    query: Result<Query<UnassignQuery>, QueryRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Query(query) = query?;
    session.require_staff()?;

    let class_id = query
        .class_id
        .ok_or_else(|| CatalystError::Validation("classId is required".into()))?;

    let deleted = state
        .store
        .delete_class_assignment(session.school_id(), session.user_id(), class_id)
        .await?;
    if !deleted {
        return Err(CatalystError::NotFound(format!("Class {} is not assigned", class_id)).into());
    }

    Ok(Json(SuccessResponse { success: true }))
}
