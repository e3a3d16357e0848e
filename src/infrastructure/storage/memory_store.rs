//! Process-lifetime store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::errors::StorageError;
use crate::domain::ports::{KeyValueStorePort, StorageKey};

/// Session-scoped store; forgotten when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStorePort for MemoryStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.values.write().insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.values.write().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_writer_wins() {
        let store = MemoryStore::new();

        store.set(StorageKey::User, "first").await.unwrap();
        store.set(StorageKey::User, "second").await.unwrap();

        assert_eq!(store.get(StorageKey::User).await.unwrap().as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_removes_every_key() {
        let store = MemoryStore::new();
        for key in StorageKey::ALL {
            store.set(key, "x").await.unwrap();
        }

        store.clear().await.unwrap();

        assert!(store.is_empty());
        store.remove(StorageKey::User).await.unwrap();
    }
}
