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

async fn admin_token(pool: &PgPool) -> String {
    let email = generate_unique_email();
    create_test_user(pool, "Test Admin", &email, "adminpass123", "admin").await;
    let app = setup_test_app(pool.clone()).await;
    get_auth_token(app, &email, "adminpass123").await
}

fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_counts(pool: PgPool) {
    let token = admin_token(&pool).await;

    let s1 = create_test_user(&pool, "S One", &generate_unique_email(), "pass12345", "student")
        .await;
    create_test_user(&pool, "S Two", &generate_unique_email(), "pass12345", "student").await;
    create_test_user(&pool, "T One", &generate_unique_email(), "pass12345", "teacher").await;
    let subject = create_test_subject(&pool, "Counting", &generate_unique_code()).await;
    enroll_student(&pool, s1, subject).await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request("GET", "/api/admin/stats", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["total_students"], 2);
    assert_eq!(body["total_teachers"], 1);
    assert_eq!(body["total_subjects"], 1);
    assert_eq!(body["total_enrollments"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_and_duplicate_email(pool: PgPool) {
    let token = admin_token(&pool).await;
    let email = generate_unique_email();

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/create-student",
            &token,
            json!({
                "name": "New Student",
                "email": email,
                "password": "studentpass123",
                "phone": "555-0100"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Student created successfully");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["user"].get("password").is_none());

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/create-student",
            &token,
            json!({
                "name": "Other Student",
                "email": email,
                "password": "studentpass123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_subject_code_is_uppercased_and_unique_case_insensitively(pool: PgPool) {
    let token = admin_token(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/create-subject",
            &token,
            json!({ "name": "Math", "code": "math101", "credits": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["subject"]["code"], "MATH101");

    for dup in ["MATH101", "Math101", "math101"] {
        let app = setup_test_app(pool.clone()).await;
        let response = app
            .oneshot(authed_json_request(
                "POST",
                "/api/admin/create-subject",
                &token,
                json!({ "name": "Math again", "code": dup }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["message"], "Subject code already exists");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_subject_credits_default_and_lenient_parsing(pool: PgPool) {
    let token = admin_token(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/create-subject",
            &token,
            json!({ "name": "Defaults", "code": generate_unique_code() }),
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["subject"]["credits"], 3);

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/create-subject",
            &token,
            json!({ "name": "Stringy", "code": generate_unique_code(), "credits": "4" }),
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["subject"]["credits"], 4);

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/create-subject",
            &token,
            json!({ "name": "Junk", "code": generate_unique_code(), "credits": "lots" }),
        ))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["subject"]["credits"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_subjects_replaces_existing_set(pool: PgPool) {
    let token = admin_token(&pool).await;

    let teacher_id =
        create_test_user(&pool, "Replace T", &generate_unique_email(), "pass12345", "teacher")
            .await;
    let a = create_test_subject(&pool, "Subject A", &generate_unique_code()).await;
    let b = create_test_subject(&pool, "Subject B", &generate_unique_code()).await;
    let c = create_test_subject(&pool, "Subject C", &generate_unique_code()).await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/assign-subjects",
            &token,
            json!({ "teacher_id": teacher_id, "subject_ids": [a, b] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["teacher"]["subjects_count"], 2);

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/assign-subjects",
            &token,
            json!({ "teacher_id": teacher_id, "subject_ids": [c] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["teacher"]["subjects_count"], 1);
    assert_eq!(body["teacher"]["subjects"][0]["id"], c.to_string());

    let remaining: Vec<Uuid> = sqlx::query_scalar(
        "SELECT subject_id FROM teacher_subjects WHERE teacher_id = $1",
    )
    .bind(teacher_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(remaining, vec![c]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_subjects_validations(pool: PgPool) {
    let token = admin_token(&pool).await;
    let subject = create_test_subject(&pool, "Lonely", &generate_unique_code()).await;
    let teacher_id =
        create_test_user(&pool, "Valid T", &generate_unique_email(), "pass12345", "teacher").await;
    let student_id =
        create_test_user(&pool, "Not T", &generate_unique_email(), "pass12345", "student").await;

    // empty subject list
    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/assign-subjects",
            &token,
            json!({ "teacher_id": teacher_id, "subject_ids": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // unknown teacher
    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/assign-subjects",
            &token,
            json!({ "teacher_id": Uuid::new_v4(), "subject_ids": [subject] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // a student id is not a teacher
    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/assign-subjects",
            &token,
            json!({ "teacher_id": student_id, "subject_ids": [subject] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_student_partial_and_password_rehash(pool: PgPool) {
    let token = admin_token(&pool).await;
    let email = generate_unique_email();
    let student_id = create_test_user(&pool, "Before", &email, "oldpass1234", "student").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/admin/students/{student_id}"),
            &token,
            json!({ "name": "After" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["student"]["name"], "After");
    assert_eq!(body["student"]["email"], email);

    // old password still valid: no password was supplied
    let app = setup_test_app(pool.clone()).await;
    get_auth_token(app, &email, "oldpass1234").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/admin/students/{student_id}"),
            &token,
            json!({ "password": "newpass1234" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool).await;
    get_auth_token(app, &email, "newpass1234").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_then_missing(pool: PgPool) {
    let token = admin_token(&pool).await;
    let student_id =
        create_test_user(&pool, "Gone", &generate_unique_email(), "pass12345", "student").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/admin/students/{student_id}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/admin/students/{student_id}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_listing_includes_enrollment_annotations(pool: PgPool) {
    let token = admin_token(&pool).await;
    let student_id =
        create_test_user(&pool, "Annotated", &generate_unique_email(), "pass12345", "student")
            .await;
    let s1 = create_test_subject(&pool, "Algebra", &generate_unique_code()).await;
    let s2 = create_test_subject(&pool, "Biology", &generate_unique_code()).await;
    enroll_student(&pool, student_id, s1).await;
    enroll_student(&pool, student_id, s2).await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request("GET", "/api/admin/students", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let student = body["students"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == student_id.to_string())
        .unwrap();
    assert_eq!(student["enrolled_count"], 2);
    assert_eq!(student["enrolled_subjects"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_routes_forbidden_for_other_roles(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, "Sneaky T", &email, "teacherpass1", "teacher").await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "teacherpass1").await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request("GET", "/api/admin/stats", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teachers_with_subjects_join(pool: PgPool) {
    let token = admin_token(&pool).await;
    let teacher_id =
        create_test_user(&pool, "Joined T", &generate_unique_email(), "pass12345", "teacher")
            .await;
    let subject = create_test_subject(&pool, "History", &generate_unique_code()).await;
    assign_subject(&pool, teacher_id, subject).await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(authed_request(
            "GET",
            "/api/admin/teachers-with-subjects",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let teacher = body["teachers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == teacher_id.to_string())
        .unwrap();
    assert_eq!(teacher["subjects"][0]["name"], "History");
}
