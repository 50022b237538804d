//! Password hashing for admin accounts (Argon2id, PHC string format).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use campus_types::{DomainError, RepoError};

/// Shortest accepted admin password.
pub const MIN_PASSWORD_LEN: usize = 10;

/// Checks password strength rules before hashing.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Hashes a password with a fresh random salt.
///
/// CPU-heavy; async callers should run it on the blocking pool.
pub fn hash_password(password: &str) -> Result<String, RepoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored PHC hash.
///
/// A malformed stored hash verifies as `false`.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
