//! Persistence adapter contracts and backends.
//!
//! # Responsibility
//! - Define the key-value slot contract consumed by the habit repository.
//! - Provide memory, file and SQLite backends behind that contract.
//!
//! # Invariants
//! - Stores hold opaque text blobs; they never interpret the payload.
//! - Keys are non-empty and free of path separators.
//! - Store failures are returned as `StoreError`; callers decide whether to
//!   degrade or escalate.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a key-value backend.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Db(DbError),
    InvalidKey(String),
    /// Backend refused the operation, e.g. quota exhausted or read-only.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
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

/// Durable key-value slot holding serialized blobs.
pub trait KeyValueStore {
    /// Reads the blob stored under `key`, or `None` when nothing was written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the blob stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// Rejects keys that cannot safely name a file or table row.
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    let invalid = key.trim().is_empty()
        || key.contains(['/', '\\', '\0'])
        || key.starts_with('.');
    if invalid {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_key;

    #[test]
    fn validate_key_rejects_path_like_values() {
        assert!(validate_key("habitTracker_habits").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("  ").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("nested/key").is_err());
        assert!(validate_key(".hidden").is_err());
    }
}
