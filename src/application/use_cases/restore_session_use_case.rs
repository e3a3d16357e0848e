//! Session restoration on startup.

use tracing::{debug, info, warn};

use crate::application::dto::Session;
use crate::application::services::SessionStorage;
use crate::domain::errors::{AuthError, StorageError};

/// Restores a previously saved session.
pub struct RestoreSessionUseCase {
    storage: SessionStorage,
}

impl RestoreSessionUseCase {
    #[must_use]
    pub const fn new(storage: SessionStorage) -> Self {
        Self { storage }
    }

    /// Returns the stored session when it has a profile and an access token.
    ///
    /// A corrupt profile is wiped and treated as signed out.
    ///
    /// # Errors
    /// Returns error if storage cannot be read.
    pub async fn execute(&self) -> Result<Option<Session>, AuthError> {
        debug!("Checking storage for a saved session");
        match self.storage.load_session().await {
            Ok(Some(session)) if session.tokens.is_some() => {
                info!(user_id = %session.user.id(), "Restored saved session");
                Ok(Some(session))
            }
            Ok(Some(_)) => {
                debug!("Saved profile has no access token");
                Ok(None)
            }
            Ok(None) => {
                debug!("No saved session");
                Ok(None)
            }
            Err(StorageError::Corrupt(reason)) => {
                warn!(reason = %reason, "Discarding corrupt session");
                self.storage.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AccessToken, TokenPair, UserProfile};
    use crate::domain::ports::mocks::MockKeyValueStore;
    use crate::domain::ports::{KeyValueStorePort, StorageKey};
    use std::sync::Arc;

    fn storage() -> (Arc<MockKeyValueStore>, SessionStorage) {
        let durable = Arc::new(MockKeyValueStore::new());
        let storage = SessionStorage::new(durable.clone(), Arc::new(MockKeyValueStore::new()));
        (durable, storage)
    }

    #[tokio::test]
    async fn test_restores_saved_session() {
        let (_, storage) = storage();
        let session = Session::new(
            UserProfile::new("u-1", "Ada", "ada@school.test"),
            TokenPair::from_raw(Some("abc"), None),
            None,
        );
        storage.save_session(&session, true).await.unwrap();

        let restored = RestoreSessionUseCase::new(storage).execute().await.unwrap();

        assert_eq!(restored, Some(session));
    }

    #[tokio::test]
    async fn test_profile_without_token_is_signed_out() {
        let (_, storage) = storage();
        let session = Session::new(UserProfile::new("u-1", "Ada", "ada@school.test"), None, None);
        storage.save_session(&session, false).await.unwrap();

        let restored = RestoreSessionUseCase::new(storage).execute().await.unwrap();

        assert!(restored.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_profile_is_cleared() {
        let (durable, storage) = storage();
        durable.set(StorageKey::User, "{not json").await.unwrap();
        durable
            .set(StorageKey::AccessToken, AccessToken::new("abc").unwrap().as_str())
            .await
            .unwrap();

        let restored = RestoreSessionUseCase::new(storage).execute().await.unwrap();

        assert!(restored.is_none());
        assert!(!durable.contains(StorageKey::AccessToken).await);
    }
}
