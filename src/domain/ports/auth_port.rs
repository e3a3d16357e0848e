//! Authentication port definition.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::entities::{SchoolId, TokenPair, UserProfile};
use crate::domain::errors::ApiError;

/// Which login endpoint to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Portal {
    /// Platform administrator.
    #[default]
    Admin,
    /// School staff account.
    School,
}

impl Portal {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::School => "School",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Admin => Self::School,
            Self::School => Self::Admin,
        }
    }
}

/// Login credentials; the password is wiped on drop.
#[derive(Clone)]
pub struct Credentials {
    pub portal: Portal,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("portal", &self.portal)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Login that still needs an OTP before a session is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    pub portal: Portal,
    pub email: String,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub remember_me: bool,
}

/// New school sign-up.
#[derive(Clone)]
pub struct SchoolRegistration {
    pub school_name: String,
    pub admin_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for SchoolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchoolRegistration")
            .field("school_name", &self.school_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Success payload shared by every authentication endpoint.
#[derive(Debug, Clone, Default)]
pub struct AuthPayload {
    pub user: Option<UserProfile>,
    pub tokens: Option<TokenPair>,
    pub school_id: Option<SchoolId>,
    pub requires_verification: bool,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
}

/// Port for the backend's authentication endpoints.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Signs in through the admin or school portal.
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError>;

    /// Completes a pending login with a one-time code.
    async fn verify_otp(
        &self,
        pending: &PendingVerification,
        code: &str,
    ) -> Result<AuthPayload, ApiError>;

    /// Requests a new one-time code.
    async fn resend_otp(&self, pending: &PendingVerification) -> Result<(), ApiError>;

    /// Registers a new school and its first administrator.
    async fn register_school(
        &self,
        registration: &SchoolRegistration,
    ) -> Result<AuthPayload, ApiError>;
}
