//! Database models
//!
//! Entity structs that map to PostgreSQL tables, plus the identity view handed
//! to the session layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Primary key of the `users` table
pub type UserId = i64;

// ============================================================================
// User Model
// ============================================================================

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// User without credentials, as carried in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<UserRecord> for UserIdentity {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

impl From<&UserRecord> for UserIdentity {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
