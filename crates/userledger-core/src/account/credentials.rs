//! Password hashing and verification.
//!
//! One-way transformation of plaintext passwords via bcrypt. Each hash
//! embeds a fresh salt, so hashing the same password twice yields
//! different strings that both verify. The work factor is tunable; the
//! default is cost 10.

use bcrypt::BcryptError;
use thiserror::Error;

/// Default bcrypt work factor.
pub const DEFAULT_COST: u32 = 10;

/// Error type for credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Refused to hash an empty password.
    #[error("password must not be empty")]
    EmptyPassword,

    /// Hashing failed or the stored hash is malformed.
    #[error("bcrypt error: {0}")]
    Hash(#[from] BcryptError),

    /// The offloaded hashing task was cancelled or panicked.
    #[error("hashing task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Hash a plaintext password at [`DEFAULT_COST`].
///
/// # Errors
///
/// Returns an error if the password is empty or hashing fails.
pub fn hash_password(plaintext: &str) -> CredentialResult<String> {
    hash_password_with_cost(plaintext, DEFAULT_COST)
}

/// Hash a plaintext password at an explicit bcrypt cost (4-31).
///
/// # Errors
///
/// Returns an error if the password is empty, the cost is out of range,
/// or hashing fails.
pub fn hash_password_with_cost(plaintext: &str, cost: u32) -> CredentialResult<String> {
    if plaintext.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Check a plaintext password against a stored hash.
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns an error only if the stored hash is malformed.
pub fn verify_password(plaintext: &str, stored: &str) -> CredentialResult<bool> {
    Ok(bcrypt::verify(plaintext, stored)?)
}
