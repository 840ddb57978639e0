use std::collections::HashMap;

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::UserBrief;
use crate::utils::errors::AppError;

use super::model::{SUBJECT_COLUMNS, Subject, SubjectWithTeachers};

pub struct SubjectService;

impl SubjectService {
    /// Full catalog ordered by name, each subject with its assigned
    /// teachers. Used by the admin and student listings.
    #[instrument(skip(db))]
    pub async fn list_with_teachers(db: &PgPool) -> Result<Vec<SubjectWithTeachers>, AppError> {
        let query = format!("SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY name");
        let subjects = sqlx::query_as::<_, Subject>(&query).fetch_all(db).await?;

        #[derive(sqlx::FromRow)]
        struct SubjectTeacherRow {
            subject_id: Uuid,
            id: Uuid,
            name: String,
            email: String,
        }

        let ids: Vec<Uuid> = subjects.iter().map(|s| s.id).collect();
        let rows = sqlx::query_as::<_, SubjectTeacherRow>(
            "SELECT ts.subject_id, u.id, u.name, u.email
             FROM teacher_subjects ts
             JOIN users u ON u.id = ts.teacher_id
             WHERE ts.subject_id = ANY($1)
             ORDER BY u.name",
        )
        .bind(&ids)
        .fetch_all(db)
        .await?;

        let mut by_subject: HashMap<Uuid, Vec<UserBrief>> = HashMap::new();
        for row in rows {
            by_subject.entry(row.subject_id).or_default().push(UserBrief {
                id: row.id,
                name: row.name,
                email: row.email,
            });
        }

        Ok(subjects
            .into_iter()
            .map(|subject| {
                let teachers = by_subject.remove(&subject.id).unwrap_or_default();
                SubjectWithTeachers::new(subject, teachers)
            })
            .collect())
    }
}
