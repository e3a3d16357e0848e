//! Authentication DTOs.

use zeroize::Zeroizing;

use crate::domain::entities::{SchoolId, TokenPair, UserProfile};
use crate::domain::ports::{Credentials, PendingVerification, Portal};

/// Login request data.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Portal, email and password.
    pub credentials: Credentials,
    /// Keep the session in durable storage.
    pub remember_me: bool,
}

impl LoginRequest {
    /// Creates new login request; session-scoped unless [`Self::remembered`] is used.
    #[must_use]
    pub fn new(portal: Portal, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                portal,
                email: email.into().trim().to_string(),
                password: Zeroizing::new(password.into()),
            },
            remember_me: false,
        }
    }

    /// Sets the remember-me flag.
    #[must_use]
    pub const fn remembered(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }
}

/// Authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user.
    pub user: UserProfile,
    /// Bearer tokens, when the backend issued any.
    pub tokens: Option<TokenPair>,
    /// Active school.
    pub school_id: Option<SchoolId>,
}

impl Session {
    /// Creates new session; the school falls back to the one on the profile.
    #[must_use]
    pub fn new(user: UserProfile, tokens: Option<TokenPair>, school_id: Option<SchoolId>) -> Self {
        let school_id = school_id.or_else(|| user.school_id().cloned());
        Self {
            user,
            tokens,
            school_id,
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Session issued.
    Authenticated(Session),
    /// A one-time code must be verified first.
    VerificationRequired(PendingVerification),
}
