//! Role-based authorization guards.
//!
//! Authorization is two explicit, composable checks: a role guard applied
//! as a route layer (this module) and per-resource ownership predicates
//! inside the services (e.g. "this assignment belongs to the caller").
//!
//! The guard verifies the token, loads the caller's user row fresh from the
//! database (so a deleted user's token stops working immediately), checks
//! the role, and attaches the row as [`CurrentUser`] for handlers.

use axum::{
    Extension,
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{USER_COLUMNS, User, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// The authenticated caller's user row, inserted into request extensions by
/// the role guard.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

async fn load_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
}

pub async fn require_role(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    role: UserRole,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    let user = load_user(&state.db, auth_user.user_id()?).await?;

    if user.role != role {
        return Err(AppError::Forbidden(format!(
            "Access denied. This endpoint requires the {} role",
            role
        )));
    }

    parts.extensions.insert(CurrentUser(user));

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(State(state), req, next, UserRole::Admin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(State(state), req, next, UserRole::Teacher).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(State(state), req, next, UserRole::Student).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Convenience extractor so handlers can take the guard-attached user
/// directly instead of `Extension<CurrentUser>`.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Ok(Extension(current)) =
            Extension::<CurrentUser>::from_request_parts(parts, state).await
        {
            return Ok(current);
        }

        // Route without the guard layer (should not happen for protected
        // routes); fall back to token + row load without a role check.
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let user = load_user(&state.db, auth_user.user_id()?).await?;
        Ok(CurrentUser(user))
    }
}
