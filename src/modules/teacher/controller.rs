use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::CurrentUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::storage::is_allowed_content_type;
use crate::utils::errors::AppError;

use super::model::{
    AssignmentFilter, AssignmentsResponse, MyEnrollmentsResponse, MyStudentsResponse,
    MySubjectsResponse, UploadAssignmentResponse, UploadForm,
};
use super::service::TeacherService;

/// Subjects the calling teacher is assigned to
#[utoipa::path(
    get,
    path = "/api/teacher/subjects",
    responses(
        (status = 200, description = "Assigned subjects", body = MySubjectsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state, current))]
pub async fn get_my_subjects(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<MySubjectsResponse>, AppError> {
    let subjects = TeacherService::my_subjects(&state.db, current.0.id).await?;
    Ok(Json(MySubjectsResponse { subjects }))
}

/// Students enrolled in any of the calling teacher's subjects
#[utoipa::path(
    get,
    path = "/api/teacher/students",
    responses(
        (status = 200, description = "Roster students", body = MyStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state, current))]
pub async fn get_my_students(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<MyStudentsResponse>, AppError> {
    let students = TeacherService::my_students(&state.db, current.0.id).await?;
    Ok(Json(MyStudentsResponse { students }))
}

/// Per-subject rosters with enrollment timestamps
#[utoipa::path(
    get,
    path = "/api/teacher/enrollments",
    responses(
        (status = 200, description = "Per-subject rosters", body = MyEnrollmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state, current))]
pub async fn get_my_enrollments(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<MyEnrollmentsResponse>, AppError> {
    let subjects = TeacherService::my_enrollments(&state.db, current.0.id).await?;
    Ok(Json(MyEnrollmentsResponse { subjects }))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut subject_id: Option<Uuid> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "subject_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid subject_id field: {e}")))?;
                subject_id = Some(
                    Uuid::parse_str(text.trim())
                        .map_err(|_| AppError::BadRequest("Invalid subject_id".to_string()))?,
                );
            }
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid title field: {e}"))
                })?);
            }
            "description" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid description field: {e}"))
                })?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let (subject_id, title) = match (subject_id, title.filter(|t| !t.trim().is_empty())) {
        (Some(subject_id), Some(title)) => (subject_id, title),
        _ => {
            return Err(AppError::BadRequest(
                "Missing required fields: subject_id, title".to_string(),
            ));
        }
    };

    if !is_allowed_content_type(&content_type) {
        return Err(AppError::BadRequest(
            "Invalid file type. Only PDF, images (JPEG, PNG, GIF), PPT, PPTX, DOC, and DOCX \
             files are allowed."
                .to_string(),
        ));
    }

    Ok(UploadForm {
        subject_id,
        title,
        description,
        file_name,
        content_type,
        bytes,
    })
}

/// Upload coursework for a subject the calling teacher is assigned to
#[utoipa::path(
    post,
    path = "/api/teacher/assignments/upload",
    request_body(content = String, content_type = "multipart/form-data", description = "Fields: file, subject_id, title, description?"),
    responses(
        (status = 201, description = "Assignment uploaded successfully", body = UploadAssignmentResponse),
        (status = 400, description = "Missing file/fields or disallowed type", body = ErrorResponse),
        (status = 403, description = "Teacher is not assigned to this subject", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state, current, multipart))]
pub async fn upload_assignment(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadAssignmentResponse>), AppError> {
    let form = read_upload_form(multipart).await?;

    let assignment =
        TeacherService::upload_assignment(&state.db, state.storage.as_ref(), current.0.id, form)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadAssignmentResponse {
            message: "Assignment uploaded successfully".to_string(),
            assignment,
        }),
    ))
}

/// List the calling teacher's coursework, newest first
#[utoipa::path(
    get,
    path = "/api/teacher/assignments",
    params(AssignmentFilter),
    responses(
        (status = 200, description = "Assignments", body = AssignmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state, current))]
pub async fn get_assignments(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(filter): Query<AssignmentFilter>,
) -> Result<Json<AssignmentsResponse>, AppError> {
    let assignments =
        TeacherService::list_assignments(&state.db, current.0.id, filter.subject_id).await?;
    Ok(Json(AssignmentsResponse { assignments }))
}

/// Delete one of the calling teacher's assignments
#[utoipa::path(
    delete,
    path = "/api/teacher/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted successfully"),
        (status = 403, description = "Assignment belongs to another teacher", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
#[instrument(skip(state, current))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    TeacherService::delete_assignment(&state.db, state.storage.as_ref(), current.0.id, id).await?;
    Ok(Json(json!({ "message": "Assignment deleted successfully" })))
}
