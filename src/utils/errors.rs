use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application error taxonomy, mapped onto HTTP responses.
///
/// Every handler returns `Result<_, AppError>`; the `IntoResponse` impl is
/// the single place where errors become status codes and JSON bodies.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    DuplicateEmail,
    DuplicateCode,
    DuplicateEnrollment,
    Storage(anyhow::Error),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::DuplicateEmail
            | Self::DuplicateCode
            | Self::DuplicateEnrollment => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::DuplicateEmail => "Email already exists".to_string(),
            Self::DuplicateCode => "Subject code already exists".to_string(),
            Self::DuplicateEnrollment => "Already enrolled in this subject".to_string(),
            Self::Storage(_) => "File storage error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) | Self::Internal(err) => write!(f, "{err}"),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal causes are logged here and never leak to the client.
        match &self {
            Self::Storage(err) => tracing::error!(error = ?err, "file storage failure"),
            Self::Internal(err) => tracing::error!(error = ?err, "unhandled internal error"),
            _ => {}
        }

        let body = Json(json!({ "message": self.message() }));
        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
