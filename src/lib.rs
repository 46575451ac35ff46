//! SimpleValidationApp - user signup and login with cookie sessions
//!
//! Server-rendered signup and login forms backed by bcrypt password hashes,
//! a PostgreSQL (or in-memory) user store and signed JWT session cookies.

pub mod app;
pub mod core;
pub mod ui;
