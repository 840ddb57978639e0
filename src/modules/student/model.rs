use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::subjects::model::{Subject, SubjectWithTeachers};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollRequest {
    pub subject_id: Uuid,
}

/// A subject the student is enrolled in, with the enrollment timestamp.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledSubject {
    #[serde(flatten)]
    pub subject: Subject,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableSubjectsResponse {
    pub subjects: Vec<SubjectWithTeachers>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledSubjectsResponse {
    pub subjects: Vec<EnrolledSubject>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentChangeResponse {
    pub message: String,
    pub subjects: Vec<EnrolledSubject>,
}
