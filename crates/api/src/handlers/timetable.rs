//! Timetable administration: subjects, schemes, entries, conflict checks and
//! copying a timetable between classes. Every handler here is admin-only.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use catalyst_core::{
    conflicts::{dedup_conflicts, find_conflicts},
    errors::CatalystError,
    models::{
        conflict::{BatchConflictRequest, ConflictCheckRequest, ConflictCheckResponse},
        school::ListSubjectsResponse,
        timetable::{
            CopyTimetableRequest, CopyTimetableResponse, CreateEntryRequest, CreateEntryResponse,
            ListEntriesResponse, ListSchemesResponse, SaveSchemeRequest, SuccessResponse,
            TimetableScheme, UpdateEntryRequest,
        },
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::class_in_school;
use crate::{
    ApiState,
    middleware::{auth::Session, error_handling::AppError},
};

pub async fn list_subjects(
    State(state): State<Arc<ApiState>>,
    session: Session,
) -> Result<Json<ListSubjectsResponse>, AppError> {
    session.require_admin()?;

    let subjects = state.store.list_subjects(session.school_id()).await?;
    Ok(Json(ListSubjectsResponse { subjects }))
}

/// Stored schemes with the default first; the built-in presets when the
/// school has none yet.
pub async fn list_schemes(
    State(state): State<Arc<ApiState>>,
    session: Session,
) -> Result<Json<ListSchemesResponse>, AppError> {
    session.require_admin()?;

    let mut schemes = state.store.list_schemes(session.school_id()).await?;
    if schemes.is_empty() {
        schemes = TimetableScheme::presets();
    }

    Ok(Json(ListSchemesResponse { schemes }))
}

fn scheme_from_request(id: Uuid, payload: SaveSchemeRequest) -> Result<TimetableScheme, AppError> {
    let scheme = TimetableScheme::new(
        id,
        payload.name.trim(),
        payload.description,
        payload.working_days,
        payload.time_slots,
    );
    scheme.validate()?;
    Ok(scheme)
}

pub async fn create_scheme(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<SaveSchemeRequest>, JsonRejection>,
) -> Result<Json<TimetableScheme>, AppError> {
    let Json(payload) = payload?;
    session.require_admin()?;

    let is_default = payload.is_default;
    let scheme = scheme_from_request(Uuid::new_v4(), payload)?;

    state
        .store
        .create_scheme(session.school_id(), scheme.clone(), is_default)
        .await?;

    info!("Scheme {} ({}) created", scheme.id, scheme.name);
    Ok(Json(scheme))
}

/// Applies an edited scheme, replacing its stored slots.
pub async fn update_scheme(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Path(id): Path<Uuid>,
    payload: Result<Json<SaveSchemeRequest>, JsonRejection>,
) -> Result<Json<TimetableScheme>, AppError> {
    let Json(payload) = payload?;
    session.require_admin()?;

    let is_default = payload.is_default;
    let scheme = scheme_from_request(id, payload)?;

    let updated = state
        .store
        .update_scheme(session.school_id(), scheme.clone(), is_default)
        .await?;
    if !updated {
        return Err(CatalystError::NotFound(format!("Scheme {} not found", id)).into());
    }

    info!("Scheme {} ({}) applied", scheme.id, scheme.name);
    Ok(Json(scheme))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesQuery {
    pub class_id: Option<Uuid>,
}

pub async fn list_entries(
    State(state): State<Arc<ApiState>>,
    session: Session,
    query: Result<Query<EntriesQuery>, QueryRejection>,
) -> Result<Json<ListEntriesResponse>, AppError> {
    let Query(query) = query?;
    session.require_admin()?;

    let class_id = query
        .class_id
        .ok_or_else(|| CatalystError::Validation("classId is required".into()))?;

    let entries = state.store.list_entries(session.school_id(), class_id).await?;
    Ok(Json(ListEntriesResponse { entries }))
}

pub async fn create_entry(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<Json<CreateEntryResponse>, AppError> {
    let Json(payload) = payload?;
    session.require_admin()?;

    if payload.time_slot_id.trim().is_empty() {
        return Err(CatalystError::Validation("timeSlotId is required".into()).into());
    }

    let class = class_in_school(&state, &session, payload.class_id).await?;
    let (day, slot) = (payload.day_of_week, payload.time_slot_id.clone());

    let entry_id = state
        .store
        .create_entry(session.school_id(), payload, session.user_id())
        .await?
        .ok_or_else(|| {
            CatalystError::Conflict(format!(
                "{} already has an entry on {} in slot {}",
                class.name, day, slot
            ))
        })?;

    info!("Entry {} created for {} on {} slot {}", entry_id, class.name, day, slot);
    Ok(Json(CreateEntryResponse {
        entry_id,
        success: true,
    }))
}

pub async fn update_entry(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<UpdateEntryRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(mut payload) = payload?;
    session.require_admin()?;

    // A blank room clears it like an absent one.
    payload.room_number = payload
        .room_number
        .map(|room| room.trim().to_string())
        .filter(|room| !room.is_empty());

    let entry_id = payload.entry_id;
    let updated = state
        .store
        .update_entry(session.school_id(), payload, session.user_id())
        .await?;
    if !updated {
        return Err(CatalystError::NotFound(format!("Entry {} not found", entry_id)).into());
    }

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryQuery {
    pub entry_id: Option<Uuid>,
}

pub async fn delete_entry(
    State(state): State<Arc<ApiState>>,
    session: Session,
    query: Result<Query<DeleteEntryQuery>, QueryRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Query(query) = query?;
    session.require_admin()?;

    let entry_id = query
        .entry_id
        .ok_or_else(|| CatalystError::Validation("entryId is required".into()))?;

    let deleted = state
        .store
        .delete_entry(session.school_id(), entry_id, session.user_id())
        .await?;
    if !deleted {
        return Err(CatalystError::NotFound(format!("Entry {} not found", entry_id)).into());
    }

    info!("Entry {} deleted", entry_id);
    Ok(Json(SuccessResponse { success: true }))
}

/// Clashes of one prospective entry with what is already booked school-wide.
pub async fn check_conflicts(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<ConflictCheckRequest>, JsonRejection>,
) -> Result<Json<ConflictCheckResponse>, AppError> {
    let Json(check) = payload?;
    session.require_admin()?;

    let booked = state
        .store
        .list_booked_entries(session.school_id(), Some(check.day_of_week))
        .await?;

    Ok(Json(ConflictCheckResponse::new(find_conflicts(&check, &booked))))
}

/// Runs many checks against one snapshot of the bookings and returns the
/// de-duplicated union.
pub async fn check_conflicts_batch(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<BatchConflictRequest>, JsonRejection>,
) -> Result<Json<ConflictCheckResponse>, AppError> {
    let Json(batch) = payload?;
    session.require_admin()?;

    if batch.checks.is_empty() {
        return Ok(Json(ConflictCheckResponse::new(Vec::new())));
    }

    let booked = state
        .store
        .list_booked_entries(session.school_id(), None)
        .await?;

    let conflicts = batch
        .checks
        .iter()
        .flat_map(|check| find_conflicts(check, &booked))
        .collect();

    Ok(Json(ConflictCheckResponse::new(dedup_conflicts(conflicts))))
}

pub async fn copy_timetable(
    State(state): State<Arc<ApiState>>,
    session: Session,
    payload: Result<Json<CopyTimetableRequest>, JsonRejection>,
) -> Result<Json<CopyTimetableResponse>, AppError> {
    let Json(payload) = payload?;
    session.require_admin()?;

    if payload.source_class_id == payload.target_class_id {
        return Err(CatalystError::Validation("Source and target class must differ".into()).into());
    }

    let source = class_in_school(&state, &session, payload.source_class_id).await?;
    let target = class_in_school(&state, &session, payload.target_class_id).await?;

    let copied = state
        .store
        .copy_entries(session.school_id(), source.id, target.id, session.user_id())
        .await? as usize;

    info!("Copied {} entries from {} to {}", copied, source.name, target.name);
    Ok(Json(CopyTimetableResponse {
        message: format!("Copied {} entries from {} to {}", copied, source.name, target.name),
        copied,
    }))
}
