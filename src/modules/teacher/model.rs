//! Coursework entity and teacher-facing response DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::subjects::model::{Subject, SubjectBrief};
use crate::modules::users::model::UserBrief;

/// Category a coursework file is classified into, derived from its declared
/// content type at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "file_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Image,
    Pptx,
    Ppt,
    Doc,
    Docx,
    Other,
}

impl FileType {
    /// Classify a declared content type. Unrecognized types fall back to
    /// `Other`; the upload allow-list rejects those before this runs.
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type {
            "application/pdf" => Self::Pdf,
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" => Self::Image,
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Self::Pptx
            }
            "application/vnd.ms-powerpoint" => Self::Ppt,
            "application/msword" => Self::Doc,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Self::Docx,
            _ => Self::Other,
        }
    }
}

/// A coursework record: metadata plus a pointer to the externally stored
/// binary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_public_id: String,
    pub file_name: String,
    pub file_type: FileType,
    pub file_size: Option<i64>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// Assignment joined with teacher and subject briefs for responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentWithRelations {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub teacher: UserBrief,
    pub subject: SubjectBrief,
}

/// A student on a teacher's roster, annotated with the subset of the
/// teacher's subjects they are enrolled in.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub enrolled_subjects: Vec<SubjectBrief>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

/// Per-subject roster with enrollment timestamps.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectRoster {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub credits: i32,
    pub students: Vec<EnrolledStudent>,
    pub student_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MySubjectsResponse {
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyStudentsResponse {
    pub students: Vec<RosterStudent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyEnrollmentsResponse {
    pub subjects: Vec<SubjectRoster>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentsResponse {
    pub assignments: Vec<AssignmentWithRelations>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadAssignmentResponse {
    pub message: String,
    pub assignment: AssignmentWithRelations,
}

/// Fields parsed out of the upload multipart form.
#[derive(Debug)]
pub struct UploadForm {
    pub subject_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AssignmentFilter {
    pub subject_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_allowed_content_types() {
        assert_eq!(FileType::from_content_type("application/pdf"), FileType::Pdf);
        assert_eq!(FileType::from_content_type("image/png"), FileType::Image);
        assert_eq!(FileType::from_content_type("image/gif"), FileType::Image);
        assert_eq!(
            FileType::from_content_type("application/vnd.ms-powerpoint"),
            FileType::Ppt
        );
        assert_eq!(
            FileType::from_content_type(
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            ),
            FileType::Pptx
        );
        assert_eq!(
            FileType::from_content_type("application/msword"),
            FileType::Doc
        );
        assert_eq!(
            FileType::from_content_type(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            FileType::Docx
        );
    }

    #[test]
    fn unknown_content_type_falls_back_to_other() {
        assert_eq!(FileType::from_content_type("application/zip"), FileType::Other);
        assert_eq!(FileType::from_content_type(""), FileType::Other);
    }
}
