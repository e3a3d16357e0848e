//! Key/value persistence port used for session state.

use async_trait::async_trait;

use crate::domain::errors::StorageError;

/// Keys persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    User,
    SchoolId,
}

impl StorageKey {
    pub const ALL: [Self; 4] = [
        Self::AccessToken,
        Self::RefreshToken,
        Self::User,
        Self::SchoolId,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::User => "user",
            Self::SchoolId => "school_id",
        }
    }
}

/// Port for a get/set/remove store. Writes overwrite; last writer wins.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Reads a value.
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Writes a value.
    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Removes a value; missing keys are not an error.
    async fn remove(&self, key: StorageKey) -> Result<(), StorageError>;

    /// Removes every known key.
    async fn clear(&self) -> Result<(), StorageError> {
        for key in StorageKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    /// Mock store for testing.
    #[derive(Default)]
    pub struct MockKeyValueStore {
        values: RwLock<HashMap<StorageKey, String>>,
    }

    impl MockKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn contains(&self, key: StorageKey) -> bool {
            self.values.read().await.contains_key(&key)
        }
    }

    #[async_trait]
    impl KeyValueStorePort for MockKeyValueStore {
        async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
            Ok(self.values.read().await.get(&key).cloned())
        }

        async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
            self.values.write().await.insert(key, value.to_string());
            Ok(())
        }

        async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
            self.values.write().await.remove(&key);
            Ok(())
        }
    }
}
