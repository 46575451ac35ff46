//! Signup and login form validation
//!
//! Every field is checked and each failing field contributes at most one
//! message. Messages come out in field order: username, email, password,
//! repeat password for signup; email, password for login.

use serde::Serialize;

use crate::core::auth::password::{MAX_PASSWORD_BYTES, PasswordHasher};
use crate::core::auth::service::{LoginRequest, SignupRequest};
use crate::core::db::models::UserRecord;

/// Shortest accepted username
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Longest accepted username
pub const MAX_USERNAME_LENGTH: usize = 10;

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: usize = 5;

pub const USERNAME_REQUIRED: &str = "Username is required";
pub const USERNAME_LENGTH: &str = "Username must have characters between 4-10";
pub const USERNAME_CHARACTERS: &str = "Username can only contain letters and numbers";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const PASSWORD_COMPLEXITY: &str = "Password must be at least 5 characters long and contain an uppercase letter, a number and a special character";
pub const PASSWORD_TOO_LONG: &str = "Password must be at most 72 bytes long";
pub const REPEAT_PASSWORD_MISMATCH: &str = "Repeat password does not match or is missing";
pub const EMAIL_NOT_FOUND: &str = "Email does not exist";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const INCORRECT_PASSWORD: &str = "Incorrect password";
pub const ACCOUNT_TAKEN: &str = "Username or email already taken";

/// Non-secret form values sent back so the user does not retype them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub username: String,
    pub email: String,
}

/// Ordered validation errors plus the echoed form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub values: FormValues,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Validate a signup form
pub fn validate_signup(request: &SignupRequest) -> ValidationResult {
    let mut result = ValidationResult {
        errors: Vec::new(),
        values: FormValues {
            username: request.username.clone(),
            email: request.email.clone(),
        },
    };

    if let Some(message) = username_error(&request.username) {
        result.push(message);
    }

    if request.email.is_empty() {
        result.push(EMAIL_REQUIRED);
    }

    if !is_strong_password(&request.password) {
        result.push(PASSWORD_COMPLEXITY);
    } else if request.password.len() > MAX_PASSWORD_BYTES {
        result.push(PASSWORD_TOO_LONG);
    }

    if request.repeat_password.is_empty() || request.repeat_password != request.password {
        result.push(REPEAT_PASSWORD_MISMATCH);
    }

    result
}

/// Validate a login form against the record found for its email, if any
pub fn validate_login(
    request: &LoginRequest,
    user: Option<&UserRecord>,
    hasher: &PasswordHasher,
) -> ValidationResult {
    let mut result = ValidationResult {
        errors: Vec::new(),
        values: FormValues {
            username: String::new(),
            email: request.email.clone(),
        },
    };

    if request.email.is_empty() {
        result.push(EMAIL_REQUIRED);
    } else if user.is_none() {
        result.push(EMAIL_NOT_FOUND);
    }

    if request.password.is_empty() {
        result.push(PASSWORD_REQUIRED);
    } else if let Some(user) = user
        && !hasher.verify(&request.password, &user.password_hash)
    {
        result.push(INCORRECT_PASSWORD);
    }

    result
}

fn username_error(username: &str) -> Option<&'static str> {
    let length = username.chars().count();

    if username.is_empty() {
        Some(USERNAME_REQUIRED)
    } else if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        Some(USERNAME_LENGTH)
    } else if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(USERNAME_CHARACTERS)
    } else {
        None
    }
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str, repeat: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            repeat_password: repeat.to_string(),
        }
    }

    fn valid_signup() -> SignupRequest {
        signup("alice1", "alice@example.com", "Secr3t!", "Secr3t!")
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn stored_user(hasher: &PasswordHasher, password: &str) -> UserRecord {
        UserRecord {
            id: 1,
            username: "alice1".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: hasher.hash(password).unwrap(),
        }
    }

    // ========================================================================
    // Signup
    // ========================================================================

    #[test]
    fn test_valid_signup_has_no_errors() {
        let result = validate_signup(&valid_signup());

        assert!(result.is_valid());
        assert_eq!(result.values.username, "alice1");
        assert_eq!(result.values.email, "alice@example.com");
    }

    #[test]
    fn test_empty_signup_reports_every_field_in_order() {
        let result = validate_signup(&SignupRequest::default());

        assert_eq!(
            result.errors,
            vec![
                USERNAME_REQUIRED,
                EMAIL_REQUIRED,
                PASSWORD_COMPLEXITY,
                REPEAT_PASSWORD_MISMATCH,
            ]
        );
    }

    #[test]
    fn test_username_length_bounds() {
        for username in ["abcd", "abcde12345", "Ab12", "ABCDEFGHIJ"] {
            let mut request = valid_signup();
            request.username = username.to_string();
            assert!(validate_signup(&request).is_valid(), "{username}");
        }

        for username in ["ab", "abc", "abcdefghijk", "a1234567890"] {
            let mut request = valid_signup();
            request.username = username.to_string();
            assert_eq!(validate_signup(&request).errors, vec![USERNAME_LENGTH], "{username}");
        }
    }

    #[test]
    fn test_username_must_be_alphanumeric() {
        for username in ["user_1", "us er", "bob-by", "abcé", "a.bcd"] {
            let mut request = valid_signup();
            request.username = username.to_string();
            assert_eq!(
                validate_signup(&request).errors,
                vec![USERNAME_CHARACTERS],
                "{username}"
            );
        }
    }

    #[test]
    fn test_username_length_counts_characters() {
        // Ten characters but more than ten bytes: length passes, charset fails
        let mut request = valid_signup();
        request.username = "ééééééééé1".to_string();

        assert_eq!(validate_signup(&request).errors, vec![USERNAME_CHARACTERS]);
    }

    #[test]
    fn test_strong_passwords_accepted() {
        for password in ["Abc1!", "P@ssw0rd", "ZZZZ9#", "1A    ", "Sécur1té!"] {
            let request = signup("alice1", "a@example.com", password, password);
            assert!(validate_signup(&request).is_valid(), "{password}");
        }
    }

    #[test]
    fn test_weak_passwords_rejected() {
        for password in ["abcde", "Ab1!", "abc1!", "ABCDE!", "Abcde1", "Abcdef!"] {
            let request = signup("alice1", "a@example.com", password, password);
            assert_eq!(
                validate_signup(&request).errors,
                vec![PASSWORD_COMPLEXITY],
                "{password}"
            );
        }
    }

    #[test]
    fn test_password_over_72_bytes_rejected() {
        let longest = format!("Aa1!{}", "x".repeat(68));
        let request = signup("alice1", "a@example.com", &longest, &longest);
        assert!(validate_signup(&request).is_valid());

        let too_long = format!("{longest}Zz9?");
        let request = signup("alice1", "a@example.com", &too_long, &too_long);
        assert_eq!(validate_signup(&request).errors, vec![PASSWORD_TOO_LONG]);

        // 42 characters, 80 bytes
        let multibyte = format!("Aa1!{}", "é".repeat(38));
        let request = signup("alice1", "a@example.com", &multibyte, &multibyte);
        assert_eq!(validate_signup(&request).errors, vec![PASSWORD_TOO_LONG]);
    }

    #[test]
    fn test_repeat_password_mismatch() {
        let request = signup("alice1", "a@example.com", "Secr3t!", "Secr3t?");
        assert_eq!(validate_signup(&request).errors, vec![REPEAT_PASSWORD_MISMATCH]);

        let request = signup("alice1", "a@example.com", "Secr3t!", "");
        assert_eq!(validate_signup(&request).errors, vec![REPEAT_PASSWORD_MISMATCH]);
    }

    #[test]
    fn test_short_username_weak_password_and_mismatch_together() {
        let request = signup("ab", "a@example.com", "abcde", "abcdf");

        assert_eq!(
            validate_signup(&request).errors,
            vec![USERNAME_LENGTH, PASSWORD_COMPLEXITY, REPEAT_PASSWORD_MISMATCH]
        );
    }

    #[test]
    fn test_email_only_needs_to_be_present() {
        let request = signup("alice1", "not-an-email", "Secr3t!", "Secr3t!");
        assert!(validate_signup(&request).is_valid());

        let request = signup("alice1", "", "Secr3t!", "Secr3t!");
        assert_eq!(validate_signup(&request).errors, vec![EMAIL_REQUIRED]);
    }

    #[test]
    fn test_signup_never_echoes_passwords() {
        let result = validate_signup(&signup("ab", "a@example.com", "Secr3t!", "nope"));
        let json = serde_json::to_string(&result).unwrap();

        assert!(!json.contains("Secr3t!"));
        assert!(!json.contains("nope"));
        assert!(json.contains("a@example.com"));
    }

    // ========================================================================
    // Login
    // ========================================================================

    #[test]
    fn test_login_unknown_email() {
        let hasher = PasswordHasher::new();
        let result = validate_login(&login("x@x.com", "Secr3t!"), None, &hasher);

        assert_eq!(result.errors, vec![EMAIL_NOT_FOUND]);
        assert_eq!(result.values.email, "x@x.com");
        assert!(result.values.username.is_empty());
    }

    #[test]
    fn test_login_wrong_password() {
        let hasher = PasswordHasher::new();
        let user = stored_user(&hasher, "Secr3t!");

        let result = validate_login(&login("alice@example.com", "Wrong1!"), Some(&user), &hasher);

        assert_eq!(result.errors, vec![INCORRECT_PASSWORD]);
    }

    #[test]
    fn test_login_correct_password() {
        let hasher = PasswordHasher::new();
        let user = stored_user(&hasher, "Secr3t!");

        let result = validate_login(&login("alice@example.com", "Secr3t!"), Some(&user), &hasher);

        assert!(result.is_valid());
    }

    #[test]
    fn test_login_empty_fields() {
        let hasher = PasswordHasher::new();
        let result = validate_login(&LoginRequest::default(), None, &hasher);

        assert_eq!(result.errors, vec![EMAIL_REQUIRED, PASSWORD_REQUIRED]);
    }

    #[test]
    fn test_login_unknown_email_and_missing_password() {
        let hasher = PasswordHasher::new();
        let result = validate_login(&login("x@x.com", ""), None, &hasher);

        assert_eq!(result.errors, vec![EMAIL_NOT_FOUND, PASSWORD_REQUIRED]);
    }
}
