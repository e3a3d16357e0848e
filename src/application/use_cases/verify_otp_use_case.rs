//! One-time code verification.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::login_use_case::establish_session;
use crate::application::dto::Session;
use crate::application::services::SessionStorage;
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, PendingVerification};

const CODE_LENGTH: std::ops::RangeInclusive<usize> = 4..=8;

/// Completes a login that returned [`crate::application::LoginOutcome::VerificationRequired`].
#[derive(Clone)]
pub struct VerifyOtpUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage: SessionStorage,
}

impl VerifyOtpUseCase {
    #[must_use]
    pub const fn new(auth_port: Arc<dyn AuthPort>, storage: SessionStorage) -> Self {
        Self { auth_port, storage }
    }

    fn ensure_pending(pending: &PendingVerification) -> Result<(), AuthError> {
        if pending.session_id.is_none() && pending.user_id.is_none() {
            return Err(AuthError::NoPendingVerification);
        }
        Ok(())
    }

    /// Verifies `code` and persists the issued session.
    ///
    /// # Errors
    /// Returns [`AuthError::OtpRejected`] when the backend refuses the code.
    pub async fn execute(
        &self,
        pending: &PendingVerification,
        code: &str,
    ) -> Result<Session, AuthError> {
        Self::ensure_pending(pending)?;

        let code = code.trim();
        if !CODE_LENGTH.contains(&code.len()) || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AuthError::invalid_input("the code must be 4 to 8 digits"));
        }

        debug!(portal = pending.portal.label(), "Verifying one-time code");

        let payload = self
            .auth_port
            .verify_otp(pending, code)
            .await
            .map_err(|e| {
                warn!(status = e.status(), error = %e, "Verification failed");
                match e.status() {
                    400 | 401 | 422 => AuthError::otp_rejected(e.message()),
                    _ => AuthError::from_api(e),
                }
            })?;

        establish_session(&self.storage, payload, pending.remember_me).await
    }

    /// Asks the backend to send a new code.
    ///
    /// # Errors
    /// Returns error if nothing is pending or the request fails.
    pub async fn resend(&self, pending: &PendingVerification) -> Result<(), AuthError> {
        Self::ensure_pending(pending)?;
        self.auth_port
            .resend_otp(pending)
            .await
            .map_err(AuthError::from_api)?;
        info!(email = %pending.email, "Verification code resent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockAuthPort, MockKeyValueStore, VALID_OTP};
    use crate::domain::ports::{Portal, StorageKey};
    use std::sync::atomic::Ordering;
    use test_case::test_case;

    fn pending(remember_me: bool) -> PendingVerification {
        PendingVerification {
            portal: Portal::School,
            email: "admin@school.test".to_string(),
            session_id: Some("otp-session".to_string()),
            user_id: Some("u-1".to_string()),
            remember_me,
        }
    }

    fn use_case(durable: Arc<MockKeyValueStore>) -> (Arc<MockAuthPort>, VerifyOtpUseCase) {
        let auth = Arc::new(MockAuthPort::requiring_otp());
        let storage = SessionStorage::new(durable, Arc::new(MockKeyValueStore::new()));
        (auth.clone(), VerifyOtpUseCase::new(auth, storage))
    }

    #[tokio::test]
    async fn test_valid_code_honors_remember_me() {
        let durable = Arc::new(MockKeyValueStore::new());
        let (_, use_case) = use_case(durable.clone());

        let session = use_case.execute(&pending(true), VALID_OTP).await.unwrap();

        assert_eq!(session.user.email(), "admin@school.test");
        assert!(durable.contains(StorageKey::AccessToken).await);
    }

    #[tokio::test]
    async fn test_wrong_code_rejected() {
        let (_, use_case) = use_case(Arc::new(MockKeyValueStore::new()));

        let result = use_case.execute(&pending(false), "000000").await;

        assert!(matches!(result, Err(AuthError::OtpRejected { .. })));
    }

    #[test_case("12" ; "too short")]
    #[test_case("123456789" ; "too long")]
    #[test_case("12a456" ; "not digits")]
    #[tokio::test]
    async fn test_malformed_codes(code: &str) {
        let (_, use_case) = use_case(Arc::new(MockKeyValueStore::new()));

        let result = use_case.execute(&pending(false), code).await;

        assert!(matches!(result, Err(AuthError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_resend() {
        let (auth, use_case) = use_case(Arc::new(MockKeyValueStore::new()));

        use_case.resend(&pending(false)).await.unwrap();

        assert_eq!(auth.resend_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nothing_pending() {
        let (auth, use_case) = use_case(Arc::new(MockKeyValueStore::new()));
        let mut stale = pending(false);
        stale.session_id = None;
        stale.user_id = None;

        assert!(matches!(
            use_case.resend(&stale).await,
            Err(AuthError::NoPendingVerification)
        ));
        assert_eq!(auth.resend_calls.load(Ordering::SeqCst), 0);
    }
}
