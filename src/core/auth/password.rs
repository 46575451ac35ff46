//! Password hashing with bcrypt

/// Cost factor for bcrypt hashing
pub const BCRYPT_COST: u32 = 10;

/// Longest password bcrypt can hash without dropping bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Password hashing error
#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(String);

/// One-way password hashing and verification
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: BCRYPT_COST }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password with a freshly generated salt.
    ///
    /// Passwords longer than `MAX_PASSWORD_BYTES` are refused rather than
    /// silently truncated.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        bcrypt::non_truncating_hash(password, self.cost).map_err(|e| HashError(e.to_string()))
    }

    /// Check a password against a stored hash.
    ///
    /// Returns `false` on mismatch, on hashes that cannot be parsed and on
    /// passwords too long to have been hashed.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }

        match bcrypt::non_truncating_verify(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password hash could not be verified: {}", e);
                false
            }
        }
    }
}
