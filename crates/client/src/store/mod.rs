//! Flat key-value persistence.
//!
//! The account system was designed around a browser-profile-style store:
//! string keys mapping to JSON-serialized string values. [`KvStore`] is that
//! seam as a trait, so the account layer can be driven against a real
//! file-backed store or an in-memory one in tests.
//!
//! Reads are infallible by policy: a missing or unreadable value is simply
//! absent. Only writes can fail.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when writing to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the store contents failed.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A flat string-to-string key-value store.
///
/// Values are JSON text by convention; the store itself does not interpret
/// them. Implementations must be safe to share across threads, but nothing
/// coordinates two *processes* opening the same backing file - a concurrent
/// read-modify-write from two processes can lose an update.
pub trait KvStore: Send + Sync {
    /// Read a value. Absent keys and unreadable storage both yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Deleting an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting the removal fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently present, in no particular order.
    fn keys(&self) -> Vec<String>;
}
