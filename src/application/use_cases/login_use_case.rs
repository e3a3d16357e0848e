//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{LoginOutcome, LoginRequest, Session};
use crate::application::services::SessionStorage;
use crate::domain::errors::{ApiError, AuthError};
use crate::domain::ports::{AuthPayload, AuthPort, PendingVerification, SchoolRegistration};

/// Handles sign in, school registration and sign out.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage: SessionStorage,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(auth_port: Arc<dyn AuthPort>, storage: SessionStorage) -> Self {
        Self { auth_port, storage }
    }

    /// Signs in through the requested portal.
    ///
    /// # Errors
    /// Returns error if the input is malformed, the backend rejects it or the
    /// session cannot be persisted.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginOutcome, AuthError> {
        let credentials = &request.credentials;
        debug!(portal = credentials.portal.label(), "Attempting login");

        if !credentials.email.contains('@') {
            warn!("Login attempted with malformed email");
            return Err(AuthError::invalid_input("enter a valid email address"));
        }
        if credentials.password.is_empty() {
            return Err(AuthError::invalid_input("password is required"));
        }

        let payload = self.auth_port.login(credentials).await.map_err(|e| {
            warn!(status = e.status(), error = %e, "Login failed");
            AuthError::from_api(e)
        })?;

        if payload.requires_verification {
            info!(portal = credentials.portal.label(), "Login requires verification code");
            return Ok(LoginOutcome::VerificationRequired(PendingVerification {
                portal: credentials.portal,
                email: credentials.email.clone(),
                session_id: payload.session_id,
                user_id: payload.user_id,
                remember_me: request.remember_me,
            }));
        }

        let session = establish_session(&self.storage, payload, request.remember_me).await?;
        Ok(LoginOutcome::Authenticated(session))
    }

    /// Registers a school. A session is returned when the backend signs the new admin in.
    ///
    /// # Errors
    /// Returns error if a required field is blank or the backend rejects the sign-up.
    pub async fn register_school(
        &self,
        registration: &SchoolRegistration,
    ) -> Result<Option<Session>, AuthError> {
        let required = [
            ("school name", registration.school_name.as_str()),
            ("admin name", registration.admin_name.as_str()),
            ("email", registration.email.as_str()),
            ("password", registration.password.as_str()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AuthError::invalid_input(format!("{field} is required")));
        }

        let payload = self
            .auth_port
            .register_school(registration)
            .await
            .map_err(AuthError::from_api)?;

        info!(school = %registration.school_name, "School registered");

        if payload.user.is_none() || payload.tokens.is_none() {
            debug!("Registration did not issue a session");
            return Ok(None);
        }

        establish_session(&self.storage, payload, false).await.map(Some)
    }

    /// Signs out and wipes both stores.
    ///
    /// # Errors
    /// Returns error if a store cannot be cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        debug!("Clearing session storage");
        match self.storage.clear().await {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear session storage");
                Err(e.into())
            }
        }
    }
}

/// Turns a successful authentication payload into a persisted session.
pub(super) async fn establish_session(
    storage: &SessionStorage,
    payload: AuthPayload,
    remember_me: bool,
) -> Result<Session, AuthError> {
    let user = payload
        .user
        .ok_or_else(|| ApiError::decode("response did not include a user profile"))?;

    let session = Session::new(user, payload.tokens, payload.school_id);
    storage.save_session(&session, remember_me).await?;

    info!(
        user_id = %session.user.id(),
        school_id = ?session.school_id.as_ref().map(|s| s.as_str()),
        remember_me,
        "Successfully authenticated"
    );

    Ok(session)
}
