use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers::timetable};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/timetable/subjects", get(timetable::list_subjects))
        .route(
            "/api/admin/timetable/schemes",
            get(timetable::list_schemes).post(timetable::create_scheme),
        )
        .route("/api/admin/timetable/schemes/:id", put(timetable::update_scheme))
        .route(
            "/api/admin/timetable/entries",
            get(timetable::list_entries)
                .post(timetable::create_entry)
                .put(timetable::update_entry)
                .delete(timetable::delete_entry),
        )
        .route("/api/admin/timetable/conflicts", post(timetable::check_conflicts))
        .route(
            "/api/admin/timetable/conflicts/batch",
            post(timetable::check_conflicts_batch),
        )
        .route("/api/admin/timetable/copy", post(timetable::copy_timetable))
}
