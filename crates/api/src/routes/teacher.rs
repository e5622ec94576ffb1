use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/teacher/classes/:grade", get(handlers::teacher::classes_by_grade))
        .route("/api/teacher/grade-levels", get(handlers::teacher::grade_levels))
        .route(
            "/api/teacher/class-assignments",
            get(handlers::teacher::list_assignments)
                .post(handlers::teacher::assign_classes)
                .delete(handlers::teacher::unassign_class),
        )
        .route("/api/teacher/students", get(handlers::teacher::list_students))
}
