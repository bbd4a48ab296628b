use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use super::feed::{ChangeFeed, ContextId, StorageChange, Subscribers};
use super::{KeyValueStore, StorageError};

/// In-memory storage shared by any number of contexts.
///
/// Models one origin's browser storage: every [`StorageContext`] created
/// from the same `SharedStorage` reads and writes the same map, and
/// writes fan out to the other contexts' change feeds.
#[derive(Clone, Default)]
pub struct SharedStorage {
    inner: Arc<SharedInner>,
}

#[derive(Default)]
struct SharedInner {
    values: RwLock<HashMap<String, String>>,
    subscribers: Subscribers,
}

impl SharedStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new context with its own identity.
    pub fn context(&self) -> StorageContext {
        StorageContext {
            shared: self.clone(),
            id: Uuid::new_v4(),
        }
    }

    fn write(&self, key: &str, value: &str, origin: ContextId) {
        self.inner
            .values
            .write()
            .insert(key.to_string(), value.to_string());
        self.inner.subscribers.publish(&StorageChange {
            key: key.to_string(),
            origin,
        });
    }
}

/// One context's handle onto a [`SharedStorage`].
#[derive(Clone)]
pub struct StorageContext {
    shared: SharedStorage,
    id: ContextId,
}

impl StorageContext {
    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl KeyValueStore for StorageContext {
    fn get(&self, key: &str) -> Option<String> {
        self.shared.inner.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.shared.write(key, value, self.id);
        Ok(())
    }

    fn subscribe(&self, key: &str) -> ChangeFeed {
        self.shared.inner.subscribers.subscribe(key, self.id)
    }
}
