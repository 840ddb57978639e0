//! Configuration modules, each loaded from environment variables.
//!
//! - [`cors`]: allowed origins for the browser client
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: token secret and expiry
//! - [`storage`]: upload directory and public file URL

pub mod cors;
pub mod database;
pub mod jwt;
pub mod storage;
