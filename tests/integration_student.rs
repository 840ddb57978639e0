mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    assign_subject, create_test_subject, create_test_user, enroll_student, generate_unique_code,
    generate_unique_email, get_auth_token, response_json, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn student_with_token(pool: &PgPool) -> (Uuid, String) {
    let email = generate_unique_email();
    let student_id = create_test_user(pool, "Test Student", &email, "studentpass1", "student").await;
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "studentpass1").await;
    (student_id, token)
}

fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn enroll_request(token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/student/enroll")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_catalog_includes_teacher_convenience_field(pool: PgPool) {
    let (_student_id, token) = student_with_token(&pool).await;

    let taught = create_test_subject(&pool, "Taught", &generate_unique_code()).await;
    create_test_subject(&pool, "Untaught", &generate_unique_code()).await;
    let teacher_id =
        create_test_user(&pool, "Prof Grey", &generate_unique_email(), "pass12345", "teacher")
            .await;
    assign_subject(&pool, teacher_id, taught).await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request("GET", "/api/student/subjects", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let subjects = body["subjects"].as_array().unwrap();
    assert_eq!(subjects.len(), 2);

    let taught_entry = subjects.iter().find(|s| s["name"] == "Taught").unwrap();
    assert_eq!(taught_entry["teacher"], "Prof Grey");

    let untaught_entry = subjects.iter().find(|s| s["name"] == "Untaught").unwrap();
    assert_eq!(untaught_entry["teacher"], "Not assigned");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_and_duplicate_enrollment(pool: PgPool) {
    let (_student_id, token) = student_with_token(&pool).await;
    let subject = create_test_subject(&pool, "Popular", &generate_unique_code()).await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(enroll_request(&token, json!({ "subject_id": subject })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Successfully enrolled in subject");
    assert_eq!(body["subjects"].as_array().unwrap().len(), 1);

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(enroll_request(&token, json!({ "subject_id": subject })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Already enrolled in this subject");

    // set size unchanged
    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request("GET", "/api/student/enrolled-subjects", &token))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["subjects"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_validations(pool: PgPool) {
    let (_student_id, token) = student_with_token(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(enroll_request(&token, json!({ "subject_id": Uuid::new_v4() })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = setup_test_app(pool).await;
    let response = app.oneshot(enroll_request(&token, json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrolled_subjects_carry_timestamp(pool: PgPool) {
    let (student_id, token) = student_with_token(&pool).await;
    let subject = create_test_subject(&pool, "Timed", &generate_unique_code()).await;
    enroll_student(&pool, student_id, subject).await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request("GET", "/api/student/enrolled-subjects", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let subjects = body["subjects"].as_array().unwrap();
    assert_eq!(subjects.len(), 1);
    assert!(subjects[0]["enrolled_at"].is_string());
    assert_eq!(subjects[0]["name"], "Timed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unenroll_and_not_found(pool: PgPool) {
    let (student_id, token) = student_with_token(&pool).await;
    let subject = create_test_subject(&pool, "Leaving", &generate_unique_code()).await;
    enroll_student(&pool, student_id, subject).await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/student/unenroll/{subject}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Successfully unenrolled from subject");
    assert_eq!(body["subjects"].as_array().unwrap().len(), 0);

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/student/unenroll/{subject}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_routes_forbidden_for_teachers(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, "Sneaky T", &email, "teacherpass1", "teacher").await;
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "teacherpass1").await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request("GET", "/api/student/enrolled-subjects", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
