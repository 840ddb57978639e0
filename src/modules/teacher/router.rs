use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;
use crate::storage::MAX_UPLOAD_SIZE;

use super::controller::{
    delete_assignment, get_assignments, get_my_enrollments, get_my_students, get_my_subjects,
    upload_assignment,
};

pub fn init_teacher_router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(get_my_subjects))
        .route("/students", get(get_my_students))
        .route("/enrollments", get(get_my_enrollments))
        .route(
            "/assignments/upload",
            post(upload_assignment).layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE)),
        )
        .route("/assignments", get(get_assignments))
        .route("/assignments/{id}", axum::routing::delete(delete_assignment))
}
