//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Password hashing and verification with bcrypt
//! - Signed session tokens (JWT) carried in a cookie
//! - Signup and login flows over a pluggable user store
//! - HTTP pages and form handlers

pub mod api;
pub mod jwt;
pub mod password;
pub mod service;

pub use api::{AuthApiState, PageError, SESSION_COOKIE_NAME, auth_api_router};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService, Session};
pub use password::{HashError, PasswordHasher};
pub use service::{AuthError, AuthOutcome, AuthService, LoginRequest, SignupRequest};
