//! # Session Resolution
//!
//! Authentication happens upstream. The guard in front of this service
//! forwards the authenticated user's id in the `X-User-Id` header, and the
//! [`Session`] extractor turns it into that user's profile. Handlers never see
//! a request without one.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use catalyst_core::{
    errors::CatalystError,
    models::school::{Profile, Role},
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller's profile. Every query a handler makes is scoped to
/// `profile.school_id`.
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: Profile,
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.profile.user_id
    }

    pub fn school_id(&self) -> Uuid {
        self.profile.school_id
    }

    pub fn require_admin(&self) -> Result<(), CatalystError> {
        match self.profile.role {
            Role::Admin => Ok(()),
            _ => Err(CatalystError::Authorization("Admin access required".into())),
        }
    }

    /// Teachers and admins.
    pub fn require_staff(&self) -> Result<(), CatalystError> {
        match self.profile.role {
            Role::Admin | Role::Teacher => Ok(()),
            _ => Err(CatalystError::Authorization("Staff access required".into())),
        }
    }

    /// Rejects an explicit school id that is not the caller's own.
    pub fn check_school(&self, school_id: Option<Uuid>) -> Result<(), CatalystError> {
        match school_id {
            Some(id) if id != self.profile.school_id => Err(CatalystError::Authorization(
                "Cannot access another school".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(|| CatalystError::Authentication("Unauthorized".into()))?;

        let profile = state
            .store
            .profile(user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!("No profile for user {}", user_id);
                CatalystError::Authentication("Unauthorized".into())
            })?;

        Ok(Session { profile })
    }
}
