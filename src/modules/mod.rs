pub mod admin;
pub mod auth;
pub mod student;
pub mod subjects;
pub mod teacher;
pub mod users;
