//! Pluggable account persistence.
//!
//! The directory talks to storage through the [`AccountStore`] trait. Two
//! backends ship with the crate: a mutex-guarded in-memory store and a
//! `SQLite` store. Both assign sequential ids and both enforce the
//! unique-email constraint at insert, so a concurrent duplicate create
//! cannot slip past the directory's pre-check.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::account::{Account, AccountId};

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert or update would violate the unique-email constraint.
    #[error("duplicate email: {email}")]
    Duplicate {
        /// Normalized email that collided.
        email: String,
    },

    /// Update or delete targeted an id that is not in the store.
    #[error("no stored account with id {0}")]
    Missing(AccountId),

    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The in-memory guard was poisoned by a panicking holder.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Account fields for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Display name.
    pub name: String,
    /// Normalized email address.
    pub email: String,
    /// Hash produced by the credential manager.
    pub credential_hash: String,
    /// Role string.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial field overwrite for update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement normalized email.
    pub email: Option<String>,
    /// Replacement credential hash.
    pub credential_hash: Option<String>,
    /// Replacement role string.
    pub role: Option<String>,
}

/// Storage contract the account directory depends on.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by its normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Look up an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Persist a new account and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] when the email is already stored,
    /// or another error if the backend fails.
    async fn insert(&self, record: AccountRecord) -> Result<Account, StoreError>;

    /// Apply the supplied fields to a stored account and return the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] for an unknown id,
    /// [`StoreError::Duplicate`] when a new email is already stored, or
    /// another error if the backend fails.
    async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, StoreError>;

    /// Remove an account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] for an unknown id, or another error
    /// if the backend fails.
    async fn delete(&self, id: AccountId) -> Result<(), StoreError>;

    /// Every stored account, in the store's natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn list_all(&self) -> Result<Vec<Account>, StoreError>;
}
