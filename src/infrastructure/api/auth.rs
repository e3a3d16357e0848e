//! Authentication endpoints.

use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use super::dto::{AuthResponse, LoginBody, OtpBody, RegisterBody};
use crate::domain::errors::ApiError;
use crate::domain::ports::{
    AuthPayload, AuthPort, Credentials, PendingVerification, Portal, SchoolRegistration,
};

/// [`AuthPort`] over HTTP.
pub struct HttpAuthApi {
    client: ApiClient,
}

impl HttpAuthApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    const fn login_path(portal: Portal) -> &'static str {
        match portal {
            Portal::Admin => "auth/admin/login",
            Portal::School => "auth/school/login",
        }
    }
}

#[async_trait]
impl AuthPort for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        debug!(portal = credentials.portal.label(), "Sending login request");
        let body = LoginBody {
            email: &credentials.email,
            password: credentials.password.as_str(),
        };
        let response: AuthResponse = self
            .client
            .post(Self::login_path(credentials.portal), &body)
            .await?;
        Ok(response.into())
    }

    async fn verify_otp(
        &self,
        pending: &PendingVerification,
        code: &str,
    ) -> Result<AuthPayload, ApiError> {
        let body = OtpBody {
            email: &pending.email,
            otp: Some(code),
            session_id: pending.session_id.as_deref(),
            user_id: pending.user_id.as_deref(),
        };
        let response: AuthResponse = self.client.post("auth/verify-otp", &body).await?;
        Ok(response.into())
    }

    async fn resend_otp(&self, pending: &PendingVerification) -> Result<(), ApiError> {
        let body = OtpBody {
            email: &pending.email,
            otp: None,
            session_id: pending.session_id.as_deref(),
            user_id: pending.user_id.as_deref(),
        };
        self.client.post_unit("auth/resend-otp", &body).await
    }

    async fn register_school(
        &self,
        registration: &SchoolRegistration,
    ) -> Result<AuthPayload, ApiError> {
        let body = RegisterBody {
            school_name: &registration.school_name,
            admin_name: &registration.admin_name,
            email: &registration.email,
            phone: &registration.phone,
            address: &registration.address,
            password: registration.password.as_str(),
        };
        let response: AuthResponse = self.client.post("auth/school/register", &body).await?;
        Ok(response.into())
    }
}
