//! # Error Handling Middleware
//!
//! Maps [`CatalystError`] onto HTTP status codes and a `{ "error": message }`
//! JSON body, so every handler fails the same way.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalyst_core::errors::CatalystError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use catalyst_api::middleware::error_handling::AppError;
/// use catalyst_core::errors::CatalystError;
///
/// async fn handler(class_id: Option<String>) -> Result<Json<String>, AppError> {
///     let class_id = class_id
///         .ok_or_else(|| CatalystError::Validation("classId is required".into()))?;
///     Ok(Json(class_id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub CatalystError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CatalystError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalystError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalystError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CatalystError::Authorization(_) => StatusCode::FORBIDDEN,
            CatalystError::Conflict(_) => StatusCode::CONFLICT,
            CatalystError::Network(_) | CatalystError::Decode(_) => StatusCode::BAD_GATEWAY,
            CatalystError::Database(_) | CatalystError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures keep their detail in the log only.
        let message = if status.is_server_error() {
            tracing::error!(error = ?self.0, "request failed");
            match status {
                StatusCode::BAD_GATEWAY => "Upstream service error".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<CatalystError> for AppError {
    fn from(err: CatalystError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CatalystError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(CatalystError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(CatalystError::Validation(rejection.body_text()))
    }
}
