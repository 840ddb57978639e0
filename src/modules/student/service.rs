use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::subjects::model::Subject;
use crate::utils::errors::AppError;

use super::model::EnrolledSubject;

#[derive(sqlx::FromRow)]
struct EnrolledSubjectRow {
    id: Uuid,
    name: String,
    code: String,
    credits: i32,
    description: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    enrolled_at: chrono::DateTime<chrono::Utc>,
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn enrolled_subjects(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<EnrolledSubject>, AppError> {
        let rows = sqlx::query_as::<_, EnrolledSubjectRow>(
            "SELECT s.id, s.name, s.code, s.credits, s.description, s.created_at, s.updated_at,
                    e.enrolled_at
             FROM enrollments e
             JOIN subjects s ON s.id = e.subject_id
             WHERE e.student_id = $1
             ORDER BY e.enrolled_at",
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| EnrolledSubject {
                subject: Subject {
                    id: row.id,
                    name: row.name,
                    code: row.code,
                    credits: row.credits,
                    description: row.description,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
                enrolled_at: row.enrolled_at,
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn enroll(db: &PgPool, student_id: Uuid, subject_id: Uuid) -> Result<(), AppError> {
        let subject_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subjects WHERE id = $1")
                .bind(subject_id)
                .fetch_one(db)
                .await?;
        if subject_exists == 0 {
            return Err(AppError::NotFound("Subject not found".to_string()));
        }

        // Pre-check keeps the common case friendly; the primary key on
        // (student_id, subject_id) decides races.
        let already = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE student_id = $1 AND subject_id = $2",
        )
        .bind(student_id)
        .bind(subject_id)
        .fetch_one(db)
        .await?;
        if already > 0 {
            return Err(AppError::DuplicateEnrollment);
        }

        sqlx::query("INSERT INTO enrollments (student_id, subject_id) VALUES ($1, $2)")
            .bind(student_id)
            .bind(subject_id)
            .execute(db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::DuplicateEnrollment
                }
                _ => AppError::from(e),
            })?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn unenroll(db: &PgPool, student_id: Uuid, subject_id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM enrollments WHERE student_id = $1 AND subject_id = $2")
                .bind(student_id)
                .bind(subject_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Enrollment not found".to_string()));
        }
        Ok(())
    }
}
