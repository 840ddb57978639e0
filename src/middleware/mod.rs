//! Authentication and authorization middleware.
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] validates the JWT and extracts claims
//! 3. [`role`] guards load the caller row, check the role, and attach
//!    [`role::CurrentUser`] for handlers
//! 4. Services apply per-resource ownership predicates

pub mod auth;
pub mod role;
