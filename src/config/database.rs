//! PostgreSQL connection pool initialization.
//!
//! The connection string is read from `DATABASE_URL`. The returned pool is
//! cheaply cloneable and lives in [`crate::state::AppState`] for the whole
//! process; request handlers receive it through state injection rather than
//! a module-level singleton.

use sqlx::PgPool;
use std::env;

/// Initializes the connection pool used by the whole application.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable;
/// there is nothing useful the server can do without a database.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
