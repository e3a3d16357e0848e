//! Keyring-backed durable store.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::{KeyValueStorePort, StorageKey};

const KEYRING_SERVICE: &str = "schooldesk";

/// System keyring store; one entry per [`StorageKey`].
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Creates new store with the default service name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    /// Creates store with a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: StorageKey) -> Result<Entry, StorageError> {
        Entry::new(&self.service, key.as_str())
            .map_err(|e| StorageError::AccessFailed(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStorePort for KeyringStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        debug!(service = %self.service, key = key.as_str(), "Reading from keyring");

        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Failed to read from keyring");
                Err(StorageError::RetrievalFailed(e.to_string()))
            }
        }
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        debug!(service = %self.service, key = key.as_str(), "Writing to keyring");

        self.entry(key)?.set_password(value).map_err(|e| {
            warn!(key = key.as_str(), error = %e, "Failed to write to keyring");
            StorageError::StorageFailed(e.to_string())
        })
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Failed to delete from keyring");
                Err(StorageError::DeletionFailed(e.to_string()))
            }
        }
    }
}
