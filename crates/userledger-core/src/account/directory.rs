//! Account lifecycle orchestration.
//!
//! [`AccountDirectory`] enforces the email-uniqueness invariant, assigns
//! roles and creation timestamps, and delegates persistence to an injected
//! [`AccountStore`]. Password hashing runs on a blocking worker thread so
//! the bcrypt work factor never stalls the async runtime.

use tokio::task;
use tracing::debug;

use super::credentials::{self, CredentialResult};
use super::model::{
    Account, AccountId, AccountProfile, AccountUpdate, DEFAULT_ROLE, NewAccount, normalize_email,
};
use super::validation::validate_new_account;
use crate::store::{AccountChanges, AccountRecord, AccountStore};
use crate::{Error, Result};

/// Orchestrates account lifecycle over a storage backend.
pub struct AccountDirectory<S> {
    store: S,
    hash_cost: u32,
}

impl<S: AccountStore> AccountDirectory<S> {
    /// Create a directory hashing at the default bcrypt cost.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_hash_cost(store, credentials::DEFAULT_COST)
    }

    /// Create a directory with an explicit bcrypt cost.
    #[must_use]
    pub const fn with_hash_cost(store: S, hash_cost: u32) -> Self {
        Self { store, hash_cost }
    }

    /// Register a new account.
    ///
    /// The email is lowercased before the uniqueness check and storage;
    /// the role defaults to [`DEFAULT_ROLE`] when not supplied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when name, email, or password is
    /// missing, [`Error::Conflict`] when the normalized email is already
    /// registered, and [`Error::Credential`] or [`Error::Store`] when a
    /// collaborator fails.
    pub async fn create(&self, request: NewAccount) -> Result<AccountProfile> {
        validate_new_account(&request)?;

        let email = normalize_email(&request.email);
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict { email });
        }

        let credential_hash = hash_blocking(request.password, self.hash_cost).await?;
        let record = AccountRecord {
            name: request.name,
            email,
            credential_hash,
            role: request.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            created_at: chrono::Utc::now(),
        };

        let account = self.store.insert(record).await?;
        debug!("created account {}", account.id);
        Ok(account.profile())
    }

    /// List every account in the store's natural order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] when the backend fails.
    pub async fn list(&self) -> Result<Vec<AccountProfile>> {
        let accounts = self.store.list_all().await?;
        Ok(accounts.iter().map(Account::profile).collect())
    }

    /// Fetch one account by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no account has the id.
    pub async fn get(&self, id: AccountId) -> Result<AccountProfile> {
        self.store
            .find_by_id(id)
            .await?
            .map(|account| account.profile())
            .ok_or(Error::NotFound(id))
    }

    /// Overwrite the supplied fields of an existing account.
    ///
    /// Omitted and empty-string fields keep their stored values. A new
    /// email is lowercased and re-checked for uniqueness; a new password
    /// is re-hashed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and
    /// [`Error::Conflict`] when the new email belongs to another account.
    pub async fn update(&self, id: AccountId, update: AccountUpdate) -> Result<AccountProfile> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(Error::NotFound(id))?;

        let mut changes = AccountChanges {
            name: provided(update.name),
            role: provided(update.role),
            ..AccountChanges::default()
        };

        if let Some(email) = provided(update.email) {
            let email = normalize_email(&email);
            if email != current.email && self.store.find_by_email(&email).await?.is_some() {
                return Err(Error::Conflict { email });
            }
            changes.email = Some(email);
        }

        if let Some(password) = provided(update.password) {
            changes.credential_hash = Some(hash_blocking(password, self.hash_cost).await?);
        }

        let account = self.store.update(id, changes).await?;
        debug!("updated account {id}");
        Ok(account.profile())
    }

    /// Remove an account, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no account has the id.
    pub async fn delete(&self, id: AccountId) -> Result<AccountId> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(Error::NotFound(id));
        }
        self.store.delete(id).await?;
        debug!("deleted account {id}");
        Ok(id)
    }

    /// Verify email/password credentials.
    ///
    /// On success, returns the account's public profile; the credential
    /// hash never leaves the directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] for an unknown email and for a wrong
    /// password alike, so callers cannot tell which check failed.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AccountProfile> {
        let email = normalize_email(email);
        let Some(account) = self.store.find_by_email(&email).await? else {
            debug!("authentication failed for {email}");
            return Err(Error::Auth);
        };

        let verified =
            verify_blocking(password.to_string(), account.credential_hash.clone()).await?;
        if !verified {
            debug!("authentication failed for {email}");
            return Err(Error::Auth);
        }

        debug!("authenticated account {}", account.id);
        Ok(account.profile())
    }
}

/// Empty strings behave like omitted fields.
fn provided(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Hash on a worker thread; bcrypt is CPU-bound.
async fn hash_blocking(password: String, cost: u32) -> CredentialResult<String> {
    task::spawn_blocking(move || credentials::hash_password_with_cost(&password, cost)).await?
}

/// Verify on a worker thread; bcrypt is CPU-bound.
async fn verify_blocking(password: String, stored: String) -> CredentialResult<bool> {
    task::spawn_blocking(move || credentials::verify_password(&password, &stored)).await?
}
