//! Persistent key-value storage with cross-context change notification.
//!
//! A "context" is one independent user of the storage: a window, a tab, or a
//! separate process pointed at the same data directory. Every context sees
//! the same values, and each context can subscribe to changes made by the
//! *others*. A context is never notified about its own writes.

mod error;
mod feed;
mod file;
mod memory;

pub use error::StorageError;
pub use feed::{ChangeFeed, ContextId, StorageChange};
pub use file::FileStore;
pub use memory::{SharedStorage, StorageContext};

/// Synchronous string store, plus a feed of external changes.
pub trait KeyValueStore: Send + Sync {
    /// Current value for `key`, or `None` if never written.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Subscribe to changes of `key` made by other contexts.
    fn subscribe(&self, key: &str) -> ChangeFeed;
}
