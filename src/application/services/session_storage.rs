//! Remember-me aware session persistence.
//!
//! Two stores are injected: a durable one that survives restarts and a
//! session-scoped one that lives only as long as the process. A session saved
//! with remember-me goes to the durable store, otherwise to the session store;
//! either way the other store is purged so a stale copy can never shadow it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::dto::Session;
use crate::domain::entities::{AccessToken, SchoolId, TokenPair, UserProfile};
use crate::domain::errors::StorageError;
use crate::domain::ports::{KeyValueStorePort, StorageKey};

/// Typed accessors over a durable and a session-scoped store.
#[derive(Clone)]
pub struct SessionStorage {
    durable: Arc<dyn KeyValueStorePort>,
    session: Arc<dyn KeyValueStorePort>,
}

impl SessionStorage {
    #[must_use]
    pub fn new(durable: Arc<dyn KeyValueStorePort>, session: Arc<dyn KeyValueStorePort>) -> Self {
        Self { durable, session }
    }

    fn stores(&self, remember_me: bool) -> (&dyn KeyValueStorePort, &dyn KeyValueStorePort) {
        if remember_me {
            (self.durable.as_ref(), self.session.as_ref())
        } else {
            (self.session.as_ref(), self.durable.as_ref())
        }
    }

    /// Reads a key, session store first.
    ///
    /// # Errors
    /// Returns error if a store cannot be read.
    pub async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        if let Some(value) = self.session.get(key).await? {
            return Ok(Some(value));
        }
        self.durable.get(key).await
    }

    /// Writes a key to the store selected by `remember_me` and removes it from the other.
    ///
    /// # Errors
    /// Returns error if a store cannot be written.
    pub async fn set(
        &self,
        key: StorageKey,
        value: &str,
        remember_me: bool,
    ) -> Result<(), StorageError> {
        let (target, other) = self.stores(remember_me);
        target.set(key, value).await?;
        other.remove(key).await
    }

    /// Removes a key from both stores.
    ///
    /// # Errors
    /// Returns error if a store cannot be written.
    pub async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.session.remove(key).await?;
        self.durable.remove(key).await
    }

    /// Persists a complete session.
    ///
    /// # Errors
    /// Returns error if the profile cannot be serialized or a store fails.
    pub async fn save_session(
        &self,
        session: &Session,
        remember_me: bool,
    ) -> Result<(), StorageError> {
        debug!(remember_me, user_id = %session.user.id(), "Saving session");

        self.clear().await?;

        let user = serde_json::to_string(&session.user)
            .map_err(|e| StorageError::StorageFailed(format!("failed to encode profile: {e}")))?;
        self.set(StorageKey::User, &user, remember_me).await?;

        if let Some(tokens) = &session.tokens {
            self.set(StorageKey::AccessToken, tokens.access.as_str(), remember_me)
                .await?;
            if let Some(refresh) = &tokens.refresh {
                self.set(StorageKey::RefreshToken, refresh.as_str(), remember_me)
                    .await?;
            }
        }

        if let Some(school_id) = &session.school_id {
            self.set(StorageKey::SchoolId, school_id.as_str(), remember_me)
                .await?;
        }

        Ok(())
    }

    /// Loads the stored session, if a profile is present.
    ///
    /// # Errors
    /// Returns [`StorageError::Corrupt`] if the stored profile cannot be decoded.
    pub async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        let Some(user) = self.user().await? else {
            return Ok(None);
        };

        let access = self.get(StorageKey::AccessToken).await?;
        let refresh = self.get(StorageKey::RefreshToken).await?;
        let tokens = TokenPair::from_raw(access.as_deref(), refresh.as_deref());
        let school_id = self.school_id().await?;

        Ok(Some(Session::new(user, tokens, school_id)))
    }

    /// Stored user profile.
    ///
    /// # Errors
    /// Returns [`StorageError::Corrupt`] if the stored profile cannot be decoded.
    pub async fn user(&self) -> Result<Option<UserProfile>, StorageError> {
        let Some(raw) = self.get(StorageKey::User).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            warn!(error = %e, "Stored user profile is corrupt");
            StorageError::Corrupt(e.to_string())
        })
    }

    /// Current access token.
    ///
    /// # Errors
    /// Returns error if a store cannot be read.
    pub async fn access_token(&self) -> Result<Option<AccessToken>, StorageError> {
        Ok(self
            .get(StorageKey::AccessToken)
            .await?
            .and_then(AccessToken::new))
    }

    /// Active school.
    ///
    /// # Errors
    /// Returns error if a store cannot be read.
    pub async fn school_id(&self) -> Result<Option<SchoolId>, StorageError> {
        Ok(self.get(StorageKey::SchoolId).await?.and_then(SchoolId::new))
    }

    /// Switches the active school, keeping it next to the stored profile.
    ///
    /// # Errors
    /// Returns error if a store cannot be read or written.
    pub async fn set_school_id(&self, school_id: &SchoolId) -> Result<(), StorageError> {
        let remember_me = self.durable.get(StorageKey::User).await?.is_some();
        self.set(StorageKey::SchoolId, school_id.as_str(), remember_me)
            .await
    }

    /// Removes every session key from both stores.
    ///
    /// # Errors
    /// Returns error if a store cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.session.clear().await?;
        self.durable.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockKeyValueStore;

    fn storage() -> (SessionStorage, Arc<MockKeyValueStore>, Arc<MockKeyValueStore>) {
        let durable = Arc::new(MockKeyValueStore::new());
        let session = Arc::new(MockKeyValueStore::new());
        (
            SessionStorage::new(durable.clone(), session.clone()),
            durable,
            session,
        )
    }

    fn sample_session() -> Session {
        Session::new(
            UserProfile::new("u-1", "Asha", "asha@school.test")
                .with_school(SchoolId::new("s-1").unwrap()),
            TokenPair::from_raw(Some("access-1"), Some("refresh-1")),
            None,
        )
    }

    #[tokio::test]
    async fn test_remembered_session_goes_to_durable_store() {
        let (storage, durable, session) = storage();

        storage.save_session(&sample_session(), true).await.unwrap();

        assert!(durable.contains(StorageKey::AccessToken).await);
        assert!(durable.contains(StorageKey::SchoolId).await);
        assert!(!session.contains(StorageKey::AccessToken).await);
    }

    #[tokio::test]
    async fn test_unremembered_session_stays_in_session_store() {
        let (storage, durable, session) = storage();

        storage.save_session(&sample_session(), false).await.unwrap();

        assert!(session.contains(StorageKey::User).await);
        assert!(!durable.contains(StorageKey::User).await);
    }

    #[tokio::test]
    async fn test_round_trip_session() {
        let (storage, _, _) = storage();
        let original = sample_session();

        storage.save_session(&original, true).await.unwrap();
        let loaded = storage.load_session().await.unwrap().unwrap();

        assert_eq!(loaded, original);
        assert_eq!(
            storage.access_token().await.unwrap().unwrap().as_str(),
            "access-1"
        );
    }

    #[tokio::test]
    async fn test_switching_remember_me_purges_other_store() {
        let (storage, durable, session) = storage();

        storage.save_session(&sample_session(), true).await.unwrap();
        storage.save_session(&sample_session(), false).await.unwrap();

        assert!(!durable.contains(StorageKey::AccessToken).await);
        assert!(session.contains(StorageKey::AccessToken).await);
    }

    #[tokio::test]
    async fn test_set_school_follows_profile_store() {
        let (storage, durable, _) = storage();
        storage.save_session(&sample_session(), true).await.unwrap();

        storage
            .set_school_id(&SchoolId::new("s-2").unwrap())
            .await
            .unwrap();

        assert_eq!(
            durable.get(StorageKey::SchoolId).await.unwrap().as_deref(),
            Some("s-2")
        );
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let (storage, _, _) = storage();
        storage.save_session(&sample_session(), true).await.unwrap();

        storage.clear().await.unwrap();

        assert!(storage.load_session().await.unwrap().is_none());
        assert!(storage.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_profile_is_reported() {
        let (storage, _, session) = storage();
        session.set(StorageKey::User, "{not json").await.unwrap();

        assert!(matches!(
            storage.load_session().await,
            Err(StorageError::Corrupt(_))
        ));
    }
}
