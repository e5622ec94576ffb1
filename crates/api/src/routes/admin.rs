use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/classes", post(handlers::admin::list_classes))
}
