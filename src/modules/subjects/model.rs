//! Subject entity and shared response forms.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::users::model::UserBrief;

/// A subject in the catalog. `code` is stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub credits: i32,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub const SUBJECT_COLUMNS: &str =
    "id, name, code, credits, description, created_at, updated_at";

/// Short subject form used inside joined responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubjectBrief {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

/// Catalog entry with its assigned teachers and a display convenience
/// field: the first assigned teacher's name, or "Not assigned".
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectWithTeachers {
    #[serde(flatten)]
    pub subject: Subject,
    pub teachers: Vec<UserBrief>,
    pub teacher: String,
}

impl SubjectWithTeachers {
    pub fn new(subject: Subject, teachers: Vec<UserBrief>) -> Self {
        let teacher = teachers
            .first()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "Not assigned".to_string());

        Self {
            subject,
            teachers,
            teacher,
        }
    }
}
