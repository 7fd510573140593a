//! In-memory account store.
//!
//! Backed by a mutex-guarded vector; useful for tests and single-process
//! deployments. The lock spans every check-then-write sequence, so
//! concurrent duplicate-email inserts cannot both land. Natural order is
//! insertion order.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use super::{AccountChanges, AccountRecord, AccountStore, StoreError};
use crate::account::{Account, AccountId};

/// Mutex-guarded in-memory backend with sequential ids.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    accounts: Vec<Account>,
    last_id: i64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, record: AccountRecord) -> Result<Account, StoreError> {
        let mut inner = self.lock()?;
        if inner.accounts.iter().any(|a| a.email == record.email) {
            return Err(StoreError::Duplicate {
                email: record.email,
            });
        }

        inner.last_id += 1;
        let account = Account {
            id: AccountId::new(inner.last_id),
            name: record.name,
            email: record.email,
            credential_hash: record.credential_hash,
            role: record.role,
            created_at: record.created_at,
        };
        inner.accounts.push(account.clone());
        debug!("inserted account {}", account.id);
        Ok(account)
    }

    async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, StoreError> {
        let mut inner = self.lock()?;

        if let Some(email) = &changes.email
            && inner.accounts.iter().any(|a| a.id != id && a.email == *email)
        {
            return Err(StoreError::Duplicate {
                email: email.clone(),
            });
        }

        let account = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::Missing(id))?;

        if let Some(name) = changes.name {
            account.name = name;
        }
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(credential_hash) = changes.credential_hash {
            account.credential_hash = credential_hash;
        }
        if let Some(role) = changes.role {
            account.role = role;
        }

        Ok(account.clone())
    }

    async fn delete(&self, id: AccountId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let position = inner
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::Missing(id))?;
        inner.accounts.remove(position);
        debug!("deleted account {id}");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.accounts.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(email: &str) -> AccountRecord {
        AccountRecord {
            name: "Test".to_string(),
            email: email.to_string(),
            credential_hash: "$2b$10$placeholderplaceholderplace".to_string(),
            role: "user".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store.insert(record("a@x.com")).await.unwrap();
        let second = store.insert(record("b@x.com")).await.unwrap();
        assert_eq!(first.id, AccountId::new(1));
        assert_eq!(second.id, AccountId::new(2));
    }

    #[tokio::test]
    async fn duplicate_email_insert_is_rejected() {
        let store = MemoryStore::new();
        store.insert(record("a@x.com")).await.unwrap();
        let err = store.insert(record("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { email } if email == "a@x.com"));
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.insert(record("a@x.com")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.insert(record("b@x.com")).await.unwrap();
        assert_eq!(second.id, AccountId::new(2));
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.insert(record("a@x.com")).await.unwrap();
        store.insert(record("b@x.com")).await.unwrap();
        store.insert(record("c@x.com")).await.unwrap();

        let emails: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.email)
            .collect();
        assert_eq!(emails, ["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn find_by_email_is_exact() {
        let store = MemoryStore::new();
        store.insert(record("a@x.com")).await.unwrap();
        assert!(store.find_by_email("a@x.com").await.unwrap().is_some());
        assert!(store.find_by_email("A@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_applies_partial_changes() {
        let store = MemoryStore::new();
        let account = store.insert(record("a@x.com")).await.unwrap();

        let updated = store
            .update(
                account.id,
                AccountChanges {
                    name: Some("Renamed".to_string()),
                    ..AccountChanges::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.created_at, account.created_at);
    }

    #[tokio::test]
    async fn update_to_taken_email_is_rejected() {
        let store = MemoryStore::new();
        store.insert(record("a@x.com")).await.unwrap();
        let other = store.insert(record("b@x.com")).await.unwrap();

        let err = store
            .update(
                other.id,
                AccountChanges {
                    email: Some("a@x.com".to_string()),
                    ..AccountChanges::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn update_missing_id_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(AccountId::new(9), AccountChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
    }

    #[tokio::test]
    async fn delete_missing_id_fails() {
        let store = MemoryStore::new();
        let err = store.delete(AccountId::new(9)).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
    }
}
