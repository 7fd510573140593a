//! Account model types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned when account creation does not specify one.
pub const DEFAULT_ROLE: &str = "user";

/// Unique identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Create a new account ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored account, including its credential hash.
///
/// This is the shape exchanged with storage backends. It deliberately does
/// not implement `Serialize`; anything that leaves the directory goes
/// through [`AccountProfile`].
#[derive(Clone, PartialEq)]
pub struct Account {
    /// Store-assigned identifier, immutable once set.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Normalized (lowercase) email address, unique within the store.
    pub email: String,
    /// Output of the credential manager's hash operation.
    pub credential_hash: String,
    /// Role string, [`DEFAULT_ROLE`] unless set otherwise.
    pub role: String,
    /// Creation time, immutable after insert.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// The account reduced to its public fields.
    #[must_use]
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("credential_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public view of an account: every field except the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// Account identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Normalized email address.
    pub email: String,
    /// Role string.
    pub role: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for account creation.
#[derive(Clone, Default, Deserialize)]
pub struct NewAccount {
    /// Display name, required.
    pub name: String,
    /// Email address, required; lowercased before any comparison or storage.
    pub email: String,
    /// Plaintext password, required; only its hash is ever stored.
    pub password: String,
    /// Optional role; defaults to [`DEFAULT_ROLE`].
    pub role: Option<String>,
}

impl NewAccount {
    /// Create a request with the default role.
    #[must_use]
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Partial update for an existing account.
///
/// `None` fields (and empty strings) keep the stored value.
#[derive(Clone, Default, Deserialize)]
pub struct AccountUpdate {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement email address; lowercased before storage.
    pub email: Option<String>,
    /// Replacement plaintext password; re-hashed before storage.
    pub password: Option<String>,
    /// Replacement role string.
    pub role: Option<String>,
}

impl std::fmt::Debug for AccountUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

/// Trim and lowercase an email address for storage and comparison.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
