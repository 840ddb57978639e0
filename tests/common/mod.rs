use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use classhub::config::cors::CorsConfig;
use classhub::config::jwt::JwtConfig;
use classhub::config::storage::StorageConfig;
use classhub::router::init_router;
use classhub::state::AppState;
use classhub::storage::LocalFileStorage;
use classhub::utils::password::hash_password;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();

    let upload_dir = std::env::temp_dir().join(format!("classhub-test-{}", Uuid::new_v4()));
    let storage_config = StorageConfig {
        upload_dir: upload_dir.clone(),
        public_base_url: "http://localhost:3000/files".to_string(),
    };

    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        storage_config: storage_config.clone(),
        storage: Arc::new(LocalFileStorage::new(
            upload_dir,
            storage_config.public_base_url.clone(),
        )),
    };

    init_router(state)
}

/// Insert a user directly; `role` is one of "admin", "teacher", "student".
pub async fn create_test_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Uuid {
    let hashed = hash_password(password).unwrap();

    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4::user_role)
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_subject(pool: &PgPool, name: &str, code: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO subjects (name, code) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn assign_subject(pool: &PgPool, teacher_id: Uuid, subject_id: Uuid) {
    sqlx::query("INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)")
        .bind(teacher_id)
        .bind(subject_id)
        .execute(pool)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn enroll_student(pool: &PgPool, student_id: Uuid, subject_id: Uuid) {
    sqlx::query("INSERT INTO enrollments (student_id, subject_id) VALUES ($1, $2)")
        .bind(student_id)
        .bind(subject_id)
        .execute(pool)
        .await
        .unwrap();
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_code() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("SUB{}", &raw[..8].to_uppercase())
}

pub async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/login")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_string(&json!({
                    "email": email,
                    "password": password
                }))
                .unwrap(),
            ))
            .unwrap(),
    )
    .await
    .unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["token"]
        .as_str()
        .unwrap_or_else(|| panic!("login did not return a token: {body}"))
        .to_string()
}

#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub const MULTIPART_BOUNDARY: &str = "X-CLASSHUB-TEST-BOUNDARY";

/// Build a multipart/form-data body with text fields and an optional file
/// part named `file`.
#[allow(dead_code)]
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
