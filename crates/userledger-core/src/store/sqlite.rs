//! `SQLite`-backed account store.
//!
//! Ids are the engine's sequential rowids; the `UNIQUE` email column
//! enforces the one-account-per-email invariant at the engine level.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use super::{AccountChanges, AccountRecord, AccountStore, StoreError};
use crate::account::{Account, AccountId};

/// Relational backend over a `SQLite` connection pool.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at the given path, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self, StoreError> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Create an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                credential_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, credential_hash, role, created_at
            FROM accounts
            WHERE email = ?
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, credential_hash, role, created_at
            FROM accounts
            WHERE id = ?
            ",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn insert(&self, record: AccountRecord) -> Result<Account, StoreError> {
        let result = sqlx::query(
            r"
            INSERT INTO accounts (name, email, credential_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.credential_hash)
        .bind(&record.role)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &record.email))?;

        let id = AccountId::new(result.last_insert_rowid());
        debug!("inserted account {id}");
        // Re-read so the returned record carries the stored representation.
        self.find_by_id(id).await?.ok_or(StoreError::Missing(id))
    }

    async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE accounts SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                credential_hash = COALESCE(?, credential_hash),
                role = COALESCE(?, role)
            WHERE id = ?
            ",
        )
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.credential_hash.as_deref())
        .bind(changes.role.as_deref())
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| match &changes.email {
            Some(email) => map_unique_violation(e, email),
            None => StoreError::Database(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }

        self.find_by_id(id).await?.ok_or(StoreError::Missing(id))
    }

    async fn delete(&self, id: AccountId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        debug!("deleted account {id}");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, email, credential_hash, role, created_at
            FROM accounts
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_account).collect()
    }
}

/// Convert a database row to an Account.
fn row_to_account(row: &SqliteRow) -> Result<Account, StoreError> {
    Ok(Account {
        id: AccountId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        credential_hash: row.try_get("credential_hash")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Surface a unique-key violation as [`StoreError::Duplicate`].
fn map_unique_violation(error: sqlx::Error, email: &str) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate {
            email: email.to_string(),
        },
        _ => StoreError::Database(error),
    }
}
