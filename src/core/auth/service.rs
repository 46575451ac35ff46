//! Authentication service
//!
//! Provides business logic for signup, login and session lookup.
//! Coordinates between the form validator, password hasher, user store and
//! session token codec.

use std::sync::Arc;

use crate::core::auth::jwt::{JwtError, JwtService, Session};
use crate::core::auth::password::{HashError, PasswordHasher};
use crate::core::db::models::UserIdentity;
use crate::core::db::repositories::{UserRepositoryError, UserStore};
use crate::core::validation::{self, ACCOUNT_TAKEN, ValidationResult};

/// Authentication service error types.
///
/// Only server-side faults end up here; anything the user can correct is a
/// `AuthOutcome::FormError`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User store unavailable: {0}")]
    StoreUnavailable(#[source] UserRepositoryError),

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl From<UserRepositoryError> for AuthError {
    fn from(err: UserRepositoryError) -> Self {
        AuthError::StoreUnavailable(err)
    }
}

/// Signup form data
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

/// Login form data
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Result of a signup or login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The form must be shown again with these errors
    FormError(ValidationResult),
    /// Credentials accepted; the caller issues a session
    Authenticated(UserIdentity),
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    jwt_service: JwtService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, jwt_service: JwtService) -> Self {
        Self {
            store,
            hasher,
            jwt_service,
        }
    }

    /// The user store this service writes to
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Register a new user
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthOutcome, AuthError> {
        let mut result = validation::validate_signup(&request);
        if !result.is_valid() {
            tracing::debug!("Signup rejected with {} form errors", result.errors.len());
            return Ok(AuthOutcome::FormError(result));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        match self
            .store
            .insert_user(&request.username, &request.email, &password_hash)
            .await
        {
            Ok(id) => Ok(AuthOutcome::Authenticated(UserIdentity {
                id,
                username: request.username,
                email: request.email,
            })),
            Err(err) if err.is_duplicate() => {
                tracing::debug!("Signup rejected: {}", err);
                result.errors.push(ACCOUNT_TAKEN.to_string());
                Ok(AuthOutcome::FormError(result))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Log in an existing user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthOutcome, AuthError> {
        // One lookup, reused by the validator
        let user = if request.email.is_empty() {
            None
        } else {
            self.store.find_user_by_email(&request.email).await?
        };

        let result = validation::validate_login(&request, user.as_ref(), &self.hasher);

        match user {
            Some(user) if result.is_valid() => Ok(AuthOutcome::Authenticated(user.into())),
            _ => {
                tracing::debug!("Login rejected with {} form errors", result.errors.len());
                Ok(AuthOutcome::FormError(result))
            }
        }
    }

    /// Issue a session token for an authenticated user
    pub fn issue_session(&self, user: &UserIdentity) -> Result<String, AuthError> {
        Ok(self.jwt_service.encode(user)?)
    }

    /// Resolve a session token; a missing token is an invalid session
    pub fn session(&self, token: Option<&str>) -> Session {
        match token {
            Some(token) if !token.is_empty() => self.jwt_service.decode(token),
            _ => Session::Invalid,
        }
    }

    /// Delete every user (admin reset)
    pub async fn reset_users(&self) -> Result<u64, AuthError> {
        Ok(self.store.delete_all_users().await?)
    }
}
