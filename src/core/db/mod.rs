//! Database module
//!
//! This module provides database connectivity, models, and the user store
//! for persistent storage using PostgreSQL and SQLx.

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used items
pub use models::{UserId, UserIdentity, UserRecord};
pub use pool::{DbConfig, DbError, create_pool, create_pool_with_migrations};
pub use repositories::{MemoryUserStore, UserRepository, UserRepositoryError, UserStore};

// Re-export sqlx types that might be needed
pub use sqlx::PgPool;
