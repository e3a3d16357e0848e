//! Bearer token value objects.

use std::fmt;

/// Access or refresh token with masking for logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
}

impl AccessToken {
    /// Creates token, rejecting empty values and embedded whitespace.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return None;
        }

        Some(Self { value })
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.chars().count();
        if len <= 10 {
            return "*".repeat(len);
        }

        let prefix: String = self.value.chars().take(4).collect();
        let suffix: String = self.value.chars().skip(len - 4).collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// Access token plus optional refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: AccessToken,
    pub refresh: Option<AccessToken>,
}

impl TokenPair {
    #[must_use]
    pub const fn new(access: AccessToken, refresh: Option<AccessToken>) -> Self {
        Self { access, refresh }
    }

    /// Builds a pair from raw strings; `None` when the access token is unusable.
    #[must_use]
    pub fn from_raw(access: Option<&str>, refresh: Option<&str>) -> Option<Self> {
        let access = AccessToken::new(access?)?;
        Some(Self::new(access, refresh.and_then(AccessToken::new)))
    }
}
