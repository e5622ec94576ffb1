use catalyst_core::{errors::CatalystError, models::school::Class};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::Session, error_handling::AppError},
};

pub mod admin;
pub mod profile;
pub mod teacher;
pub mod timetable;

/// Loads a class of the caller's school, or 404.
pub(crate) async fn class_in_school(
    state: &ApiState,
    session: &Session,
    class_id: Uuid,
) -> Result<Class, AppError> {
    state
        .store
        .get_class(session.school_id(), class_id)
        .await?
        .ok_or_else(|| AppError(CatalystError::NotFound(format!("Class {} not found", class_id))))
}
