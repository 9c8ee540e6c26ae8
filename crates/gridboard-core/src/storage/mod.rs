//! Storage abstraction for persistence.
//!
//! Everything is persisted as text values under string keys, the way a
//! browser's local storage works. The workspace collection is one such
//! value; see [`document`] for the keys in use.

mod autosave;
mod document;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_DELAY_MS};
pub use document::{
    USERS_KEY,
    WORKSPACES_KEY,
    active_workspace_key,
    load_active_workspace,
    load_workspaces,
    save_active_workspace,
    save_workspaces,
};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A key-value backend holding text values.
///
/// Implementations can store values in memory or on the filesystem. Writes
/// overwrite whatever was stored under the key before.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// List all keys.
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Check if a key exists.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
