//! Durable store for builds without keyring support.

use async_trait::async_trait;
use tracing::debug;

use super::MemoryStore;
use crate::domain::errors::StorageError;
use crate::domain::ports::{KeyValueStorePort, StorageKey};

/// Keeps "remembered" values in memory only.
/// Used when keyring feature is disabled.
#[derive(Default)]
pub struct KeyringStore {
    inner: MemoryStore,
}

impl KeyringStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Service name is ignored in the stub.
    #[must_use]
    pub fn with_service(_service: impl Into<String>) -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorePort for KeyringStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        debug!(key = key.as_str(), "Keyring feature disabled - value kept in memory");
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}
