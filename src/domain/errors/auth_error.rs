//! Authentication error types.

use thiserror::Error;

use super::{ApiError, StorageError};

/// Authentication error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("invalid login input: {reason}")]
    InvalidInput { reason: String },

    #[error("sign in rejected: {message}")]
    Rejected { message: String },

    #[error("verification code rejected: {message}")]
    OtpRejected { message: String },

    #[error("no verification is pending")]
    NoPendingVerification,

    #[error("no session available")]
    NoSessionAvailable,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Creates invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates OTP rejected error.
    #[must_use]
    pub fn otp_rejected(message: impl Into<String>) -> Self {
        Self::OtpRejected {
            message: message.into(),
        }
    }

    /// Maps an API error, turning 401/403 into a rejection.
    #[must_use]
    pub fn from_api(error: ApiError) -> Self {
        match error.status() {
            401 | 403 => Self::rejected(error.message()),
            _ => Self::Api(error),
        }
    }

    /// Returns whether the user can simply try again.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidInput { .. }
            | Self::Rejected { .. }
            | Self::OtpRejected { .. }
            | Self::NoSessionAvailable => true,
            Self::Api(e) => e.is_transport() || e.status() >= 500,
            Self::NoPendingVerification | Self::Storage(_) => false,
        }
    }

    /// Returns whether the error should be surfaced as a toast.
    #[must_use]
    pub fn should_notify(&self) -> bool {
        match self {
            Self::Api(e) => e.should_notify(),
            _ => true,
        }
    }
}
