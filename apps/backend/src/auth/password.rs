//! Password hashing (argon2, PHC strings) and strength rules.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::errors::domain::{DomainError, ValidationKind};
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// At least eight characters with an uppercase letter, a lowercase letter and a digit.
pub fn check_strength(password: &str) -> Result<(), DomainError> {
    let missing = if password.chars().count() < MIN_PASSWORD_LEN {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ))
    } else if !password.chars().any(|c| c.is_uppercase()) {
        Some("Password must contain at least one uppercase letter".to_string())
    } else if !password.chars().any(|c| c.is_lowercase()) {
        Some("Password must contain at least one lowercase letter".to_string())
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one digit".to_string())
    } else {
        None
    };

    match missing {
        Some(detail) => Err(DomainError::validation(ValidationKind::WeakPassword, detail)),
        None => Ok(()),
    }
}
