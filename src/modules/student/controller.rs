use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AvailableSubjectsResponse, EnrollRequest, EnrolledSubjectsResponse, EnrollmentChangeResponse,
};
use super::service::StudentService;

/// Browse the full subject catalog
#[utoipa::path(
    get,
    path = "/api/student/subjects",
    responses(
        (status = 200, description = "Available subjects", body = AvailableSubjectsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - student only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
#[instrument(skip(state))]
pub async fn get_available_subjects(
    State(state): State<AppState>,
) -> Result<Json<AvailableSubjectsResponse>, AppError> {
    let subjects = SubjectService::list_with_teachers(&state.db).await?;
    Ok(Json(AvailableSubjectsResponse { subjects }))
}

/// Subjects the calling student is enrolled in
#[utoipa::path(
    get,
    path = "/api/student/enrolled-subjects",
    responses(
        (status = 200, description = "Enrolled subjects", body = EnrolledSubjectsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - student only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
#[instrument(skip(state, current))]
pub async fn get_my_enrolled_subjects(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<EnrolledSubjectsResponse>, AppError> {
    let subjects = StudentService::enrolled_subjects(&state.db, current.0.id).await?;
    Ok(Json(EnrolledSubjectsResponse { subjects }))
}

/// Enroll in a subject
#[utoipa::path(
    post,
    path = "/api/student/enroll",
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Successfully enrolled in subject", body = EnrollmentChangeResponse),
        (status = 400, description = "Missing subject id or already enrolled", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
#[instrument(skip(state, current))]
pub async fn enroll(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(dto): ValidatedJson<EnrollRequest>,
) -> Result<(StatusCode, Json<EnrollmentChangeResponse>), AppError> {
    StudentService::enroll(&state.db, current.0.id, dto.subject_id).await?;

    let subjects = StudentService::enrolled_subjects(&state.db, current.0.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentChangeResponse {
            message: "Successfully enrolled in subject".to_string(),
            subjects,
        }),
    ))
}

/// Unenroll from a subject
#[utoipa::path(
    delete,
    path = "/api/student/unenroll/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Successfully unenrolled from subject", body = EnrollmentChangeResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
#[instrument(skip(state, current))]
pub async fn unenroll(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<EnrollmentChangeResponse>, AppError> {
    StudentService::unenroll(&state.db, current.0.id, subject_id).await?;

    let subjects = StudentService::enrolled_subjects(&state.db, current.0.id).await?;
    Ok(Json(EnrollmentChangeResponse {
        message: "Successfully unenrolled from subject".to_string(),
        subjects,
    }))
}
