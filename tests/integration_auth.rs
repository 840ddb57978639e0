mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use classhub::config::jwt::JwtConfig;
use classhub::utils::jwt::verify_token;
use common::{create_test_user, generate_unique_email, response_json, setup_test_app};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn login_request(email: &str, password: &str) -> Request<Body> {
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
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_returns_token_decodable_to_user_id(pool: PgPool) {
    dotenvy::dotenv().ok();
    let email = generate_unique_email();
    let user_id = create_test_user(&pool, "Login User", &email, "testpass123", "student").await;

    let app = setup_test_app(pool).await;
    let response = app.oneshot(login_request(&email, "testpass123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], email);

    let claims = verify_token(body["token"].as_str().unwrap(), &JwtConfig::from_env()).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_response_contains_no_password_hash(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, "Login User", &email, "testpass123", "teacher").await;

    let app = setup_test_app(pool).await;
    let response = app.oneshot(login_request(&email, "testpass123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body["user"].get("password").is_none());
    assert!(!body.to_string().contains("$2b$"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email_is_unauthorized(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(login_request("nobody@test.com", "whatever1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert!(body.get("token").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password_is_unauthorized(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, "Login User", &email, "rightpass123", "student").await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(login_request(&email, "wrongpass123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert!(body.get("token").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_student_cannot_login(pool: PgPool) {
    let email = generate_unique_email();
    let student_id =
        create_test_user(&pool, "Doomed Student", &email, "testpass123", "student").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(login_request(&email, "testpass123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(student_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(login_request(&email, "testpass123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_user_token_is_rejected(pool: PgPool) {
    let email = generate_unique_email();
    let student_id =
        create_test_user(&pool, "Doomed Student", &email, "testpass123", "student").await;

    let app = setup_test_app(pool.clone()).await;
    let token = common::get_auth_token(app, &email, "testpass123").await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(student_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/student/subjects")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/admin/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/admin/stats")
                .header("authorization", "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
