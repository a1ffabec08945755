//! Key-value storage contracts and implementations.
//!
//! # Responsibility
//! - Define the durable string-keyed, string-valued map every registry and
//!   ledger persists into.
//! - Keep storage transport errors separate from domain validation.
//!
//! # Invariants
//! - A missing key is `Ok(None)`, never an error.
//! - `keys()` enumerates in ascending key order for both shipped stores.
//! - `set` replaces the full value; there is no partial update.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryKvStore;
pub use sqlite_store::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error for transport and decoding failures.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Connection is missing the storage table (migrations not applied).
    MissingRequiredTable(&'static str),
    /// Persisted value under `key` could not be decoded or encoded.
    InvalidData { key: String, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "storage table `{table}` is missing; open the database through open_db")
            }
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored value under `{key}`: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string map consumed by repositories.
///
/// Implementations are single-writer; callers serialize mutations.
pub trait KvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StoreResult<()>;
    fn keys(&self) -> StoreResult<Vec<String>>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}
