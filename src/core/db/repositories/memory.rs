//! In-process user store
//!
//! Used when no database is configured and by the test suites. All checks and
//! the insert happen under one lock, which gives the same all-or-nothing
//! uniqueness guarantee as the database constraints.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{UserRepositoryError, UserStore};
use crate::core::db::models::{UserId, UserRecord};

#[derive(Default)]
struct Inner {
    next_id: UserId,
    users: Vec<UserRecord>,
}

/// User store backed by process memory
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock still holds consistent data: every mutation is a single push or clear
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, UserRepositoryError> {
        let mut inner = self.lock();

        if inner.users.iter().any(|u| u.username == username) {
            return Err(UserRepositoryError::UsernameAlreadyExists);
        }
        if inner.users.iter().any(|u| u.email == email) {
            return Err(UserRepositoryError::EmailAlreadyExists);
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.users.push(UserRecord {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        });

        Ok(id)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn delete_all_users(&self) -> Result<u64, UserRepositoryError> {
        let mut inner = self.lock();
        let removed = inner.users.len() as u64;
        inner.users.clear();
        Ok(removed)
    }

    async fn health_check(&self) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}
