use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AssignSubjectsDto, AssignSubjectsResponse, CreateStudentDto, CreateSubjectDto,
    CreateTeacherDto, CreateUserResponse, StatsResponse, StudentsResponse, SubjectResponse,
    SubjectsResponse, TeachersResponse, UpdateStudentDto, UpdateSubjectDto, UpdateTeacherDto,
};
use super::service::AdminService;

/// Aggregate counts for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Aggregate counts", body = StatsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = AdminService::stats(&state.db).await?;
    Ok(Json(stats))
}

/// Create a student account
#[utoipa::path(
    post,
    path = "/api/admin/create-student",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created successfully", body = CreateUserResponse),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let user = AdminService::create_student(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "Student created successfully".to_string(),
            user,
        }),
    ))
}

/// List students with their enrollments
#[utoipa::path(
    get,
    path = "/api/admin/students",
    responses(
        (status = 200, description = "List of students", body = StudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
) -> Result<Json<StudentsResponse>, AppError> {
    let students = AdminService::list_students(&state.db).await?;
    Ok(Json(StudentsResponse { students }))
}

/// Update a student's profile
#[utoipa::path(
    put,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated successfully"),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    let student = AdminService::update_student(&state.db, id, dto).await?;
    Ok(Json(json!({
        "message": "Student updated successfully",
        "student": student,
    })))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted successfully"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    AdminService::delete_student(&state.db, id).await?;
    Ok(Json(json!({ "message": "Student deleted successfully" })))
}

/// Create a teacher account
#[utoipa::path(
    post,
    path = "/api/admin/create-teacher",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created successfully", body = CreateUserResponse),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let user = AdminService::create_teacher(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "Teacher created successfully".to_string(),
            user,
        }),
    ))
}

/// List teachers with their assigned subjects
#[utoipa::path(
    get,
    path = "/api/admin/teachers",
    responses(
        (status = 200, description = "List of teachers", body = TeachersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
) -> Result<Json<TeachersResponse>, AppError> {
    let teachers = AdminService::list_teachers(&state.db).await?;
    Ok(Json(TeachersResponse { teachers }))
}

/// Update a teacher's profile
#[utoipa::path(
    put,
    path = "/api/admin/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated successfully"),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    let teacher = AdminService::update_teacher(&state.db, id, dto).await?;
    Ok(Json(json!({
        "message": "Teacher updated successfully",
        "teacher": teacher,
    })))
}

/// Delete a teacher
#[utoipa::path(
    delete,
    path = "/api/admin/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted successfully"),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    AdminService::delete_teacher(&state.db, id).await?;
    Ok(Json(json!({ "message": "Teacher deleted successfully" })))
}

/// Teachers joined with their subjects
#[utoipa::path(
    get,
    path = "/api/admin/teachers-with-subjects",
    responses(
        (status = 200, description = "Teachers with their subjects", body = TeachersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_teachers_with_subjects(
    State(state): State<AppState>,
) -> Result<Json<TeachersResponse>, AppError> {
    let teachers = AdminService::list_teachers(&state.db).await?;
    Ok(Json(TeachersResponse { teachers }))
}

/// Create a subject
#[utoipa::path(
    post,
    path = "/api/admin/create-subject",
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created successfully", body = SubjectResponse),
        (status = 400, description = "Validation error or duplicate code", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn create_subject(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<SubjectResponse>), AppError> {
    let subject = AdminService::create_subject(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubjectResponse {
            message: "Subject created successfully".to_string(),
            subject,
        }),
    ))
}

/// List subjects with assigned teachers
#[utoipa::path(
    get,
    path = "/api/admin/subjects",
    responses(
        (status = 200, description = "List of subjects", body = SubjectsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
) -> Result<Json<SubjectsResponse>, AppError> {
    let subjects = SubjectService::list_with_teachers(&state.db).await?;
    Ok(Json(SubjectsResponse { subjects }))
}

/// Update a subject
#[utoipa::path(
    put,
    path = "/api/admin/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    request_body = UpdateSubjectDto,
    responses(
        (status = 200, description = "Subject updated successfully", body = SubjectResponse),
        (status = 400, description = "Validation error or duplicate code", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSubjectDto>,
) -> Result<Json<SubjectResponse>, AppError> {
    let subject = AdminService::update_subject(&state.db, id, dto).await?;
    Ok(Json(SubjectResponse {
        message: "Subject updated successfully".to_string(),
        subject,
    }))
}

/// Delete a subject
#[utoipa::path(
    delete,
    path = "/api/admin/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted successfully"),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    AdminService::delete_subject(&state.db, id).await?;
    Ok(Json(json!({ "message": "Subject deleted successfully" })))
}

/// Replace a teacher's subject assignments
#[utoipa::path(
    post,
    path = "/api/admin/assign-subjects",
    request_body = AssignSubjectsDto,
    responses(
        (status = 200, description = "Subjects assigned successfully", body = AssignSubjectsResponse),
        (status = 400, description = "Missing teacher or subject ids", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn assign_subjects(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<AssignSubjectsDto>,
) -> Result<Json<AssignSubjectsResponse>, AppError> {
    if dto.subject_ids.is_empty() {
        return Err(AppError::BadRequest(
            "Teacher ID and subject IDs are required".to_string(),
        ));
    }

    let teacher = AdminService::assign_subjects(&state.db, dto.teacher_id, &dto.subject_ids).await?;
    Ok(Json(AssignSubjectsResponse {
        message: "Subjects assigned successfully".to_string(),
        teacher,
    }))
}
