//! Session tokens
//!
//! Signed (HS256) JWTs carrying the user's identity. There is no server-side
//! session table: a token is a session exactly when its signature, issuer and
//! expiry all check out. Anything else decodes to `Session::Invalid`.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::db::models::{UserId, UserIdentity};

/// Default session token lifetime (1 hour)
pub const SESSION_TOKEN_EXPIRATION_MINUTES: i64 = 60;

/// Issuer written into every token
pub const DEFAULT_ISSUER: &str = "simple-validation-app";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    /// Token issuer
    pub issuer: String,
}

impl JwtConfig {
    /// Create a new JWT configuration
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: SESSION_TOKEN_EXPIRATION_MINUTES,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// Set token expiration
    pub fn expiration(mut self, minutes: i64) -> Self {
        self.expiration_minutes = minutes;
        self
    }
}

/// JWT errors
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(String),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Username
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

impl Claims {
    /// Get the user ID, if the subject is a valid one
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// Identity carried by these claims
    pub fn identity(&self) -> Option<UserIdentity> {
        Some(UserIdentity {
            id: self.user_id()?,
            username: self.username.clone(),
            email: self.email.clone(),
        })
    }
}

/// Outcome of decoding a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Valid(Claims),
    Invalid,
}

impl Session {
    pub fn is_valid(&self) -> bool {
        matches!(self, Session::Valid(_))
    }

    /// Claims of a valid session
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Session::Valid(claims) => Some(claims),
            Session::Invalid => None,
        }
    }
}

/// Session token codec
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Build fresh claims for a user, valid from now for the configured lifetime
    pub fn claims_for(&self, user: &UserIdentity) -> Claims {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.expiration_minutes);

        Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Sign a set of claims
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Issue a session token for a user
    pub fn encode(&self, user: &UserIdentity) -> Result<String, JwtError> {
        self.encode_claims(&self.claims_for(user))
    }

    /// Verify and decode a session token
    pub fn decode(&self, token: &str) -> Session {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        // Set leeway to 0 for strict expiration checking
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) if data.claims.user_id().is_some() => Session::Valid(data.claims),
            Ok(_) => {
                tracing::debug!("Session token has a malformed subject");
                Session::Invalid
            }
            Err(e) => {
                tracing::debug!("Session token rejected: {:?}", e.kind());
                Session::Invalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig::new("test_secret_key_for_testing_only_32bytes!"))
    }

    fn alice() -> UserIdentity {
        UserIdentity {
            id: 42,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    // ========================================================================
    // JwtConfig Tests
    // ========================================================================

    #[test]
    fn test_jwt_config_new() {
        let config = JwtConfig::new("my_secret");

        assert_eq!(config.secret, "my_secret");
        assert_eq!(config.expiration_minutes, SESSION_TOKEN_EXPIRATION_MINUTES);
        assert_eq!(config.issuer, DEFAULT_ISSUER);
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("secret").expiration(30);

        assert_eq!(config.expiration_minutes, 30);
    }

    // ========================================================================
    // Encode / Decode Tests
    // ========================================================================

    #[test]
    fn test_decode_returns_encoded_claims() {
        let service = create_test_service();
        let claims = service.claims_for(&alice());

        let token = service.encode_claims(&claims).unwrap();

        assert_eq!(service.decode(&token), Session::Valid(claims));
    }

    #[test]
    fn test_claims_carry_identity_and_lifetime() {
        let service = create_test_service();
        let token = service.encode(&alice()).unwrap();

        let session = service.decode(&token);
        let claims = session.claims().unwrap();

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.identity(), Some(alice()));
        assert_eq!(claims.iss, DEFAULT_ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let service = create_test_service();

        let first = service.claims_for(&alice());
        let second = service.claims_for(&alice());

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        // Negative expiration puts exp in the past
        let service = JwtService::new(JwtConfig::new("test_secret").expiration(-1));
        let token = service.encode(&alice()).unwrap();

        assert_eq!(service.decode(&token), Session::Invalid);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let service = create_test_service();
        let token = service.encode(&alice()).unwrap();

        // Flip one bit inside the payload segment
        let payload_start = token.find('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[payload_start + 5] ^= 0x01;
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(service.decode(&tampered), Session::Invalid);
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let service = create_test_service();
        let token = service.encode(&alice()).unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[signature_start] ^= 0x01;
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(service.decode(&tampered), Session::Invalid);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let service1 = JwtService::new(JwtConfig::new("secret_one"));
        let service2 = JwtService::new(JwtConfig::new("secret_two"));

        let token = service1.encode(&alice()).unwrap();

        assert!(service1.decode(&token).is_valid());
        assert_eq!(service2.decode(&token), Session::Invalid);
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let ours = create_test_service();
        let theirs = JwtService::new(JwtConfig {
            issuer: "someone-else".to_string(),
            ..JwtConfig::new("test_secret_key_for_testing_only_32bytes!")
        });

        let token = theirs.encode(&alice()).unwrap();

        assert_eq!(ours.decode(&token), Session::Invalid);
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let service = create_test_service();

        for token in ["", "invalid", "invalid.token.here", "a.b", "...."] {
            assert_eq!(service.decode(token), Session::Invalid, "{token:?}");
        }
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let service = create_test_service();
        let mut claims = service.claims_for(&alice());
        claims.sub = "not-a-number".to_string();

        let token = service.encode_claims(&claims).unwrap();

        assert_eq!(service.decode(&token), Session::Invalid);
    }

    #[test]
    fn test_session_accessors() {
        assert!(!Session::Invalid.is_valid());
        assert!(Session::Invalid.claims().is_none());
    }
}
