//! PostgreSQL user repository
//!
//! Uniqueness relies on the `users_username_key` and `users_email_key`
//! constraints; inserts never pre-check, so two racing signups for the same
//! name cannot both succeed.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{UserRepositoryError, UserStore};
use crate::core::db::models::{UserId, UserRecord};

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, UserRepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

/// Translate a failed insert, turning constraint violations into domain errors
fn map_insert_error(err: sqlx::Error) -> UserRepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return match db_err.constraint() {
            Some(EMAIL_CONSTRAINT) => UserRepositoryError::EmailAlreadyExists,
            _ => UserRepositoryError::UsernameAlreadyExists,
        };
    }

    UserRepositoryError::DatabaseError(err)
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, UserRepositoryError> {
        sqlx::query_scalar::<_, UserId>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, email, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_all_users(&self) -> Result<u64, UserRepositoryError> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), UserRepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
