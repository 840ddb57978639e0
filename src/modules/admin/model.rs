//! Request and response DTOs for the administrative API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::subjects::model::{Subject, SubjectBrief, SubjectWithTeachers};
use crate::modules::users::model::User;
use crate::utils::serde::lenient_credits;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub phone: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    /// Accepts a number or numeric string; anything unparsable falls back
    /// to the default of 3.
    #[serde(default, deserialize_with = "lenient_credits")]
    #[schema(value_type = Option<i32>)]
    pub credits: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSubjectDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_credits")]
    #[schema(value_type = Option<i32>)]
    pub credits: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignSubjectsDto {
    pub teacher_id: Uuid,
    #[serde(default)]
    pub subject_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_subjects: i64,
    pub total_enrollments: i64,
}

/// Student row annotated with their enrollments, for admin listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentWithEnrollments {
    #[serde(flatten)]
    pub user: User,
    pub enrolled_subjects: Vec<SubjectBrief>,
    pub enrolled_count: usize,
}

/// Teacher row annotated with their assigned subjects.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherWithSubjects {
    #[serde(flatten)]
    pub user: User,
    pub subjects: Vec<SubjectBrief>,
    pub subjects_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentsResponse {
    pub students: Vec<StudentWithEnrollments>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeachersResponse {
    pub teachers: Vec<TeacherWithSubjects>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectsResponse {
    pub subjects: Vec<SubjectWithTeachers>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub message: String,
    pub subject: Subject,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignSubjectsResponse {
    pub message: String,
    pub teacher: TeacherWithSubjects,
}
