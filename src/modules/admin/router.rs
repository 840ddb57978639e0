use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    assign_subjects, create_student, create_subject, create_teacher, delete_student,
    delete_subject, delete_teacher, get_stats, get_students, get_subjects, get_teachers,
    get_teachers_with_subjects, update_student, update_subject, update_teacher,
};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/create-student", post(create_student))
        .route("/students", get(get_students))
        .route(
            "/students/{id}",
            put(update_student).delete(delete_student),
        )
        .route("/create-teacher", post(create_teacher))
        .route("/teachers", get(get_teachers))
        .route(
            "/teachers/{id}",
            put(update_teacher).delete(delete_teacher),
        )
        .route("/teachers-with-subjects", get(get_teachers_with_subjects))
        .route("/create-subject", post(create_subject))
        .route("/subjects", get(get_subjects))
        .route(
            "/subjects/{id}",
            put(update_subject).delete(delete_subject),
        )
        .route("/assign-subjects", post(assign_subjects))
}
