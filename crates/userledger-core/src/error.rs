//! Error types for the core library.

use thiserror::Error;

use crate::account::{AccountId, CredentialError, ValidationErrors};
use crate::store::StoreError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Required input fields are missing.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The email address is already registered.
    #[error("email already registered: {email}")]
    Conflict {
        /// Normalized email that collided.
        email: String,
    },

    /// No account exists with the given id.
    #[error("account not found: {0}")]
    NotFound(AccountId),

    /// Email or password did not match.
    ///
    /// Carries no detail about which of the two failed.
    #[error("invalid email or password")]
    Auth,

    /// Password hashing or verification failed.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// The storage backend failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
