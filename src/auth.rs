use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

#[derive(Debug)]
pub enum AuthError {
    /// Argon2id hashing failed.
    Hash(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Hash(message) => write!(f, "password hashing failed: {}", message),
        }
    }
}

impl std::error::Error for AuthError {}

/// Hash a password with Argon2id under a fresh random salt. The result is a
/// self-describing PHC string; the plaintext is never stored.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

/// Check a submitted password against a stored PHC hash. The comparison is
/// the verifier's constant-time check; an unparseable stored hash counts as
/// a mismatch rather than an error.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

/// Registration input rejected before any credential work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationIssue {
    EmptyField,
    PasswordMismatch,
}

impl RegistrationIssue {
    pub fn message(self) -> &'static str {
        match self {
            RegistrationIssue::EmptyField => "Please fill out all fields.",
            RegistrationIssue::PasswordMismatch => "Passwords do not match.",
        }
    }
}

pub fn validate_registration(
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), RegistrationIssue> {
    if username.is_empty() || password.is_empty() || confirmation.is_empty() {
        return Err(RegistrationIssue::EmptyField);
    }
    if password != confirmation {
        return Err(RegistrationIssue::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_rejects() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_a_mismatch() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[test]
    fn registration_validation() {
        assert_eq!(validate_registration("a", "b", "b"), Ok(()));
        assert_eq!(
            validate_registration("", "b", "b"),
            Err(RegistrationIssue::EmptyField)
        );
        assert_eq!(
            validate_registration("a", "", ""),
            Err(RegistrationIssue::EmptyField)
        );
        assert_eq!(
            validate_registration("a", "b", "c"),
            Err(RegistrationIssue::PasswordMismatch)
        );
    }
}
