//! User persistence
//!
//! `UserStore` is the seam between the auth flows and storage. Uniqueness of
//! username and email is the store's job: implementations must reject a
//! duplicate atomically and report it as `EmailAlreadyExists` or
//! `UsernameAlreadyExists`, never as a raw driver error.

mod memory;
mod user;

pub use memory::MemoryUserStore;
pub use user::UserRepository;

use async_trait::async_trait;

use crate::core::db::models::{UserId, UserRecord};

/// User repository error types
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl UserRepositoryError {
    /// Whether this is a uniqueness violation rather than a storage fault
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            UserRepositoryError::EmailAlreadyExists | UserRepositoryError::UsernameAlreadyExists
        )
    }
}

/// Storage for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, returning its new id
    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, UserRepositoryError>;

    /// Find a user by email
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Find a user by username
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Delete every user, returning how many were removed
    async fn delete_all_users(&self) -> Result<u64, UserRepositoryError>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> Result<(), UserRepositoryError>;
}
