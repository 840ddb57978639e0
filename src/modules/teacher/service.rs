use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::subjects::model::{Subject, SubjectBrief};
use crate::modules::users::model::UserBrief;
use crate::storage::{FileStorage, StorageError, sanitize_file_name};
use crate::utils::errors::AppError;

use super::model::{
    Assignment, AssignmentWithRelations, EnrolledStudent, FileType, RosterStudent, SubjectRoster,
    UploadForm,
};

#[derive(sqlx::FromRow)]
struct RosterRow {
    student_id: Uuid,
    student_name: String,
    student_email: String,
    student_phone: Option<String>,
    subject_id: Uuid,
    subject_name: String,
    subject_code: String,
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    subject_id: Uuid,
    student_id: Uuid,
    student_name: String,
    student_email: String,
    enrolled_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct AssignmentJoinRow {
    id: Uuid,
    teacher_id: Uuid,
    subject_id: Uuid,
    title: String,
    description: Option<String>,
    file_url: String,
    file_public_id: String,
    file_name: String,
    file_type: FileType,
    file_size: Option<i64>,
    uploaded_at: chrono::DateTime<chrono::Utc>,
    teacher_name: String,
    teacher_email: String,
    subject_name: String,
    subject_code: String,
}

impl From<AssignmentJoinRow> for AssignmentWithRelations {
    fn from(row: AssignmentJoinRow) -> Self {
        AssignmentWithRelations {
            assignment: Assignment {
                id: row.id,
                teacher_id: row.teacher_id,
                subject_id: row.subject_id,
                title: row.title,
                description: row.description,
                file_url: row.file_url,
                file_public_id: row.file_public_id,
                file_name: row.file_name,
                file_type: row.file_type,
                file_size: row.file_size,
                uploaded_at: row.uploaded_at,
            },
            teacher: UserBrief {
                id: row.teacher_id,
                name: row.teacher_name,
                email: row.teacher_email,
            },
            subject: SubjectBrief {
                id: row.subject_id,
                name: row.subject_name,
                code: row.subject_code,
            },
        }
    }
}

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn my_subjects(db: &PgPool, teacher_id: Uuid) -> Result<Vec<Subject>, AppError> {
        Ok(sqlx::query_as::<_, Subject>(
            "SELECT s.id, s.name, s.code, s.credits, s.description, s.created_at, s.updated_at
             FROM teacher_subjects ts
             JOIN subjects s ON s.id = ts.subject_id
             WHERE ts.teacher_id = $1
             ORDER BY s.name",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await?)
    }

    /// Students enrolled in any of the teacher's subjects, deduplicated by
    /// student and annotated with the overlap of their enrollments and the
    /// teacher's assignments.
    #[instrument(skip(db))]
    pub async fn my_students(
        db: &PgPool,
        teacher_id: Uuid,
    ) -> Result<Vec<RosterStudent>, AppError> {
        let rows = sqlx::query_as::<_, RosterRow>(
            "SELECT u.id AS student_id, u.name AS student_name, u.email AS student_email,
                    u.phone AS student_phone,
                    s.id AS subject_id, s.name AS subject_name, s.code AS subject_code
             FROM enrollments e
             JOIN users u ON u.id = e.student_id
             JOIN subjects s ON s.id = e.subject_id
             WHERE u.role = 'student'
               AND e.subject_id IN
                   (SELECT subject_id FROM teacher_subjects WHERE teacher_id = $1)
             ORDER BY u.name, s.name",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        let mut students: Vec<RosterStudent> = Vec::new();
        for row in rows {
            match students.iter_mut().find(|s| s.id == row.student_id) {
                Some(student) => student.enrolled_subjects.push(SubjectBrief {
                    id: row.subject_id,
                    name: row.subject_name,
                    code: row.subject_code,
                }),
                None => students.push(RosterStudent {
                    id: row.student_id,
                    name: row.student_name,
                    email: row.student_email,
                    phone: row.student_phone,
                    enrolled_subjects: vec![SubjectBrief {
                        id: row.subject_id,
                        name: row.subject_name,
                        code: row.subject_code,
                    }],
                }),
            }
        }

        Ok(students)
    }

    /// Per-subject rosters with enrollment timestamps, for every subject
    /// the teacher is assigned to.
    #[instrument(skip(db))]
    pub async fn my_enrollments(
        db: &PgPool,
        teacher_id: Uuid,
    ) -> Result<Vec<SubjectRoster>, AppError> {
        let subjects = Self::my_subjects(db, teacher_id).await?;
        let subject_ids: Vec<Uuid> = subjects.iter().map(|s| s.id).collect();

        let rows = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT e.subject_id, u.id AS student_id, u.name AS student_name,
                    u.email AS student_email, e.enrolled_at
             FROM enrollments e
             JOIN users u ON u.id = e.student_id
             WHERE e.subject_id = ANY($1)
             ORDER BY e.enrolled_at",
        )
        .bind(&subject_ids)
        .fetch_all(db)
        .await?;

        let mut rosters: Vec<SubjectRoster> = subjects
            .into_iter()
            .map(|s| SubjectRoster {
                id: s.id,
                name: s.name,
                code: s.code,
                credits: s.credits,
                students: Vec::new(),
                student_count: 0,
            })
            .collect();

        for row in rows {
            if let Some(roster) = rosters.iter_mut().find(|r| r.id == row.subject_id) {
                roster.students.push(EnrolledStudent {
                    id: row.student_id,
                    name: row.student_name,
                    email: row.student_email,
                    enrolled_at: row.enrolled_at,
                });
            }
        }
        for roster in &mut rosters {
            roster.student_count = roster.students.len();
        }

        Ok(rosters)
    }

    async fn is_assigned(db: &PgPool, teacher_id: Uuid, subject_id: Uuid) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM teacher_subjects WHERE teacher_id = $1 AND subject_id = $2",
        )
        .bind(teacher_id)
        .bind(subject_id)
        .fetch_one(db)
        .await?;
        Ok(count > 0)
    }

    #[instrument(skip(db, storage, form), fields(subject_id = %form.subject_id, file = %form.file_name))]
    pub async fn upload_assignment(
        db: &PgPool,
        storage: &dyn FileStorage,
        teacher_id: Uuid,
        form: UploadForm,
    ) -> Result<AssignmentWithRelations, AppError> {
        if !Self::is_assigned(db, teacher_id, form.subject_id).await? {
            return Err(AppError::Forbidden(
                "Teacher is not assigned to this subject".to_string(),
            ));
        }

        let file_type = FileType::from_content_type(&form.content_type);
        let file_size = form.bytes.len() as i64;

        let key = format!(
            "assignments/{}/{}/{}-{}",
            teacher_id,
            form.subject_id,
            Uuid::new_v4(),
            sanitize_file_name(&form.file_name)
        );

        let file_public_id = storage.save(&key, &form.bytes).await.map_err(|e| match e {
            StorageError::FileTooLarge { max_bytes } => AppError::BadRequest(format!(
                "File exceeds maximum size of {max_bytes} bytes"
            )),
            other => AppError::Storage(other.into()),
        })?;
        let file_url = storage
            .get_url(&file_public_id)
            .map_err(|e| AppError::Storage(e.into()))?;

        let assignment = sqlx::query_as::<_, Assignment>(
            "INSERT INTO assignments
                 (teacher_id, subject_id, title, description, file_url, file_public_id,
                  file_name, file_type, file_size)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, teacher_id, subject_id, title, description, file_url,
                       file_public_id, file_name, file_type, file_size, uploaded_at",
        )
        .bind(teacher_id)
        .bind(form.subject_id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(&file_url)
        .bind(&file_public_id)
        .bind(&form.file_name)
        .bind(file_type)
        .bind(file_size)
        .fetch_one(db)
        .await?;

        Self::assignment_with_relations(db, assignment.id).await
    }

    async fn assignment_with_relations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<AssignmentWithRelations, AppError> {
        let row = sqlx::query_as::<_, AssignmentJoinRow>(
            "SELECT a.id, a.teacher_id, a.subject_id, a.title, a.description, a.file_url,
                    a.file_public_id, a.file_name, a.file_type, a.file_size, a.uploaded_at,
                    u.name AS teacher_name, u.email AS teacher_email,
                    s.name AS subject_name, s.code AS subject_code
             FROM assignments a
             JOIN users u ON u.id = a.teacher_id
             JOIN subjects s ON s.id = a.subject_id
             WHERE a.id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(db))]
    pub async fn list_assignments(
        db: &PgPool,
        teacher_id: Uuid,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<AssignmentWithRelations>, AppError> {
        let rows = sqlx::query_as::<_, AssignmentJoinRow>(
            "SELECT a.id, a.teacher_id, a.subject_id, a.title, a.description, a.file_url,
                    a.file_public_id, a.file_name, a.file_type, a.file_size, a.uploaded_at,
                    u.name AS teacher_name, u.email AS teacher_email,
                    s.name AS subject_name, s.code AS subject_code
             FROM assignments a
             JOIN users u ON u.id = a.teacher_id
             JOIN subjects s ON s.id = a.subject_id
             WHERE a.teacher_id = $1
               AND ($2::uuid IS NULL OR a.subject_id = $2)
             ORDER BY a.uploaded_at DESC",
        )
        .bind(teacher_id)
        .bind(subject_id)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete an assignment owned by the caller. The external file delete
    /// is best-effort: a storage failure is logged and the record is
    /// removed regardless.
    #[instrument(skip(db, storage))]
    pub async fn delete_assignment(
        db: &PgPool,
        storage: &dyn FileStorage,
        teacher_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT id, teacher_id, subject_id, title, description, file_url,
                    file_public_id, file_name, file_type, file_size, uploaded_at
             FROM assignments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if assignment.teacher_id != teacher_id {
            return Err(AppError::Forbidden(
                "You don't have permission to delete this assignment".to_string(),
            ));
        }

        if let Err(e) = storage.delete(&assignment.file_public_id).await {
            tracing::warn!(
                assignment_id = %id,
                key = %assignment.file_public_id,
                error = %e,
                "Failed to delete stored file; removing record anyway"
            );
        }

        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }
}
