//! # userledger-core
//!
//! Core business logic for the userledger account service.
//!
//! This crate provides:
//! - Account lifecycle (create, list, get, update, delete)
//! - Email/password authentication
//! - Password hashing and verification (bcrypt)
//! - Pluggable persistence with in-memory and `SQLite` backends
//!
//! The HTTP surface is intentionally absent; callers wire
//! [`AccountDirectory`] into whatever transport they run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
mod error;
pub mod store;

pub use account::credentials;
pub use account::{
    Account, AccountDirectory, AccountId, AccountProfile, AccountUpdate, DEFAULT_ROLE, NewAccount,
    normalize_email,
};
pub use account::{
    CredentialError, CredentialResult, ValidationError, ValidationErrors, validate_new_account,
};
pub use error::{Error, Result};
pub use store::{
    AccountChanges, AccountRecord, AccountStore, MemoryStore, SqliteStore, StoreError,
};
