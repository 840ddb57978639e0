use std::collections::HashMap;

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::subjects::model::{SUBJECT_COLUMNS, Subject, SubjectBrief};
use crate::modules::users::model::{USER_COLUMNS, User, UserRole};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

use super::model::{
    CreateStudentDto, CreateSubjectDto, CreateTeacherDto, StatsResponse, StudentWithEnrollments,
    TeacherWithSubjects, UpdateStudentDto, UpdateSubjectDto, UpdateTeacherDto,
};

const DEFAULT_CREDITS: i32 = 3;

#[derive(sqlx::FromRow)]
struct StudentSubjectRow {
    student_id: Uuid,
    id: Uuid,
    name: String,
    code: String,
}

#[derive(sqlx::FromRow)]
struct TeacherSubjectRow {
    teacher_id: Uuid,
    id: Uuid,
    name: String,
    code: String,
}

pub struct AdminService;

impl AdminService {
    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool) -> Result<StatsResponse, AppError> {
        let total_students =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'student'")
                .fetch_one(db)
                .await?;
        let total_teachers =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = 'teacher'")
                .fetch_one(db)
                .await?;
        let total_subjects = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subjects")
            .fetch_one(db)
            .await?;
        let total_enrollments = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments")
            .fetch_one(db)
            .await?;

        Ok(StatsResponse {
            total_students,
            total_teachers,
            total_subjects,
            total_enrollments,
        })
    }

    async fn find_user_by_role(
        db: &PgPool,
        id: Uuid,
        role: UserRole,
    ) -> Result<User, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = $2");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(match role {
                    UserRole::Student => "Student not found".to_string(),
                    UserRole::Teacher => "Teacher not found".to_string(),
                    UserRole::Admin => "Admin not found".to_string(),
                })
            })
    }

    async fn email_taken(db: &PgPool, email: &str) -> Result<bool, AppError> {
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(db)
                .await?;
        Ok(existing > 0)
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<User, AppError> {
        // Pre-check for a friendly message; the unique index is the
        // authoritative guard under concurrency.
        if Self::email_taken(db, &dto.email).await? {
            return Err(AppError::DuplicateEmail);
        }

        let hashed_password = hash_password(&dto.password)?;
        let query = format!(
            "INSERT INTO users (name, email, password, role, phone, address)
             VALUES ($1, $2, $3, 'student', $4, $5)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(&hashed_password)
            .bind(&dto.phone)
            .bind(&dto.address)
            .fetch_one(db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::DuplicateEmail
                }
                _ => AppError::from(e),
            })
    }

    #[instrument(skip(db))]
    pub async fn list_students(db: &PgPool) -> Result<Vec<StudentWithEnrollments>, AppError> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE role = 'student' ORDER BY name");
        let students = sqlx::query_as::<_, User>(&query).fetch_all(db).await?;

        let ids: Vec<Uuid> = students.iter().map(|s| s.id).collect();
        let rows = sqlx::query_as::<_, StudentSubjectRow>(
            "SELECT e.student_id, s.id, s.name, s.code
             FROM enrollments e
             JOIN subjects s ON s.id = e.subject_id
             WHERE e.student_id = ANY($1)
             ORDER BY s.name",
        )
        .bind(&ids)
        .fetch_all(db)
        .await?;

        let mut by_student: HashMap<Uuid, Vec<SubjectBrief>> = HashMap::new();
        for row in rows {
            by_student.entry(row.student_id).or_default().push(SubjectBrief {
                id: row.id,
                name: row.name,
                code: row.code,
            });
        }

        Ok(students
            .into_iter()
            .map(|user| {
                let enrolled_subjects = by_student.remove(&user.id).unwrap_or_default();
                let enrolled_count = enrolled_subjects.len();
                StudentWithEnrollments {
                    user,
                    enrolled_subjects,
                    enrolled_count,
                }
            })
            .collect())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<User, AppError> {
        let existing = Self::find_user_by_role(db, id, UserRole::Student).await?;

        let name = dto.name.unwrap_or(existing.name);
        let email = dto.email.unwrap_or(existing.email);
        let phone = dto.phone.or(existing.phone);
        let address = dto.address.or(existing.address);

        let updated = if let Some(password) = dto.password {
            let hashed_password = hash_password(&password)?;
            let query = format!(
                "UPDATE users
                 SET name = $1, email = $2, phone = $3, address = $4, password = $5,
                     updated_at = NOW()
                 WHERE id = $6 AND role = 'student'
                 RETURNING {USER_COLUMNS}"
            );
            sqlx::query_as::<_, User>(&query)
                .bind(&name)
                .bind(&email)
                .bind(&phone)
                .bind(&address)
                .bind(&hashed_password)
                .bind(id)
                .fetch_one(db)
                .await
        } else {
            let query = format!(
                "UPDATE users
                 SET name = $1, email = $2, phone = $3, address = $4, updated_at = NOW()
                 WHERE id = $5 AND role = 'student'
                 RETURNING {USER_COLUMNS}"
            );
            sqlx::query_as::<_, User>(&query)
                .bind(&name)
                .bind(&email)
                .bind(&phone)
                .bind(&address)
                .bind(id)
                .fetch_one(db)
                .await
        }
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateEmail
            }
            _ => AppError::from(e),
        })?;

        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'student'")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Student not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<User, AppError> {
        if Self::email_taken(db, &dto.email).await? {
            return Err(AppError::DuplicateEmail);
        }

        let hashed_password = hash_password(&dto.password)?;
        let query = format!(
            "INSERT INTO users (name, email, password, role, phone, department)
             VALUES ($1, $2, $3, 'teacher', $4, $5)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(&hashed_password)
            .bind(&dto.phone)
            .bind(&dto.department)
            .fetch_one(db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::DuplicateEmail
                }
                _ => AppError::from(e),
            })
    }

    #[instrument(skip(db))]
    pub async fn list_teachers(db: &PgPool) -> Result<Vec<TeacherWithSubjects>, AppError> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE role = 'teacher' ORDER BY name");
        let teachers = sqlx::query_as::<_, User>(&query).fetch_all(db).await?;

        let ids: Vec<Uuid> = teachers.iter().map(|t| t.id).collect();
        let rows = sqlx::query_as::<_, TeacherSubjectRow>(
            "SELECT ts.teacher_id, s.id, s.name, s.code
             FROM teacher_subjects ts
             JOIN subjects s ON s.id = ts.subject_id
             WHERE ts.teacher_id = ANY($1)
             ORDER BY s.name",
        )
        .bind(&ids)
        .fetch_all(db)
        .await?;

        let mut by_teacher: HashMap<Uuid, Vec<SubjectBrief>> = HashMap::new();
        for row in rows {
            by_teacher.entry(row.teacher_id).or_default().push(SubjectBrief {
                id: row.id,
                name: row.name,
                code: row.code,
            });
        }

        Ok(teachers
            .into_iter()
            .map(|user| {
                let subjects = by_teacher.remove(&user.id).unwrap_or_default();
                let subjects_count = subjects.len();
                TeacherWithSubjects {
                    user,
                    subjects,
                    subjects_count,
                }
            })
            .collect())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<User, AppError> {
        let existing = Self::find_user_by_role(db, id, UserRole::Teacher).await?;

        let name = dto.name.unwrap_or(existing.name);
        let email = dto.email.unwrap_or(existing.email);
        let phone = dto.phone.or(existing.phone);
        let department = dto.department.or(existing.department);

        let updated = if let Some(password) = dto.password {
            let hashed_password = hash_password(&password)?;
            let query = format!(
                "UPDATE users
                 SET name = $1, email = $2, phone = $3, department = $4, password = $5,
                     updated_at = NOW()
                 WHERE id = $6 AND role = 'teacher'
                 RETURNING {USER_COLUMNS}"
            );
            sqlx::query_as::<_, User>(&query)
                .bind(&name)
                .bind(&email)
                .bind(&phone)
                .bind(&department)
                .bind(&hashed_password)
                .bind(id)
                .fetch_one(db)
                .await
        } else {
            let query = format!(
                "UPDATE users
                 SET name = $1, email = $2, phone = $3, department = $4, updated_at = NOW()
                 WHERE id = $5 AND role = 'teacher'
                 RETURNING {USER_COLUMNS}"
            );
            sqlx::query_as::<_, User>(&query)
                .bind(&name)
                .bind(&email)
                .bind(&phone)
                .bind(&department)
                .bind(id)
                .fetch_one(db)
                .await
        }
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateEmail
            }
            _ => AppError::from(e),
        })?;

        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'teacher'")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Teacher not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let code = dto.code.to_uppercase();

        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subjects WHERE code = $1")
                .bind(&code)
                .fetch_one(db)
                .await?;
        if existing > 0 {
            return Err(AppError::DuplicateCode);
        }

        let query = format!(
            "INSERT INTO subjects (name, code, credits, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {SUBJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Subject>(&query)
            .bind(&dto.name)
            .bind(&code)
            .bind(dto.credits.unwrap_or(DEFAULT_CREDITS))
            .bind(&dto.description)
            .fetch_one(db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::DuplicateCode
                }
                _ => AppError::from(e),
            })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_subject(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let query = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = $1");
        let existing = sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;

        let name = dto.name.unwrap_or(existing.name);
        let code = dto.code.map(|c| c.to_uppercase()).unwrap_or(existing.code);
        let credits = dto.credits.unwrap_or(existing.credits);
        let description = dto.description.or(existing.description);

        let query = format!(
            "UPDATE subjects
             SET name = $1, code = $2, credits = $3, description = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {SUBJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Subject>(&query)
            .bind(&name)
            .bind(&code)
            .bind(credits)
            .bind(&description)
            .bind(id)
            .fetch_one(db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::DuplicateCode
                }
                _ => AppError::from(e),
            })
    }

    #[instrument(skip(db))]
    pub async fn delete_subject(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Subject not found".to_string()));
        }
        Ok(())
    }

    /// Replace a teacher's subject assignments with the given set.
    ///
    /// Replace semantics: existing rows are deleted and the new set
    /// inserted inside one transaction, so a failure can never leave the
    /// teacher with a partially written assignment list.
    #[instrument(skip(db))]
    pub async fn assign_subjects(
        db: &PgPool,
        teacher_id: Uuid,
        subject_ids: &[Uuid],
    ) -> Result<TeacherWithSubjects, AppError> {
        Self::find_user_by_role(db, teacher_id, UserRole::Teacher).await?;

        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM teacher_subjects WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO teacher_subjects (teacher_id, subject_id)
             SELECT $1, unnest($2::uuid[])
             ON CONFLICT DO NOTHING",
        )
        .bind(teacher_id)
        .bind(subject_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::BadRequest("One or more subjects do not exist".to_string())
            }
            _ => AppError::from(e),
        })?;

        tx.commit().await?;

        Self::teacher_with_subjects(db, teacher_id).await
    }

    pub async fn teacher_with_subjects(
        db: &PgPool,
        teacher_id: Uuid,
    ) -> Result<TeacherWithSubjects, AppError> {
        let user = Self::find_user_by_role(db, teacher_id, UserRole::Teacher).await?;

        let subjects = sqlx::query_as::<_, SubjectBrief>(
            "SELECT s.id, s.name, s.code
             FROM teacher_subjects ts
             JOIN subjects s ON s.id = ts.subject_id
             WHERE ts.teacher_id = $1
             ORDER BY s.name",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        let subjects_count = subjects.len();
        Ok(TeacherWithSubjects {
            user,
            subjects,
            subjects_count,
        })
    }
}
