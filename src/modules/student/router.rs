use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{enroll, get_available_subjects, get_my_enrolled_subjects, unenroll};

pub fn init_student_router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(get_available_subjects))
        .route("/enrolled-subjects", get(get_my_enrolled_subjects))
        .route("/enroll", post(enroll))
        .route("/unenroll/{subject_id}", delete(unenroll))
}
