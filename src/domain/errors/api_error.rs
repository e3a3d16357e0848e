//! Normalized backend error.

use serde_json::Value;
use thiserror::Error;

const CONFIGURATION_ERROR_CODE: &str = "CORS_ERROR";
const MAX_PLAIN_BODY_LEN: usize = 200;

/// Error produced by any backend call, whatever shape the server used to report it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: u16,
    code: Option<String>,
    details: Option<Value>,
}

impl ApiError {
    /// Status used for failures that never reached the server.
    pub const TRANSPORT_STATUS: u16 = 0;

    /// Creates error with status and message.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: None,
            details: None,
        }
    }

    /// Attaches a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Request did not complete in time.
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(Self::TRANSPORT_STATUS, "request timed out").with_code("TIMEOUT")
    }

    /// Server could not be reached.
    #[must_use]
    pub fn connect() -> Self {
        Self::new(Self::TRANSPORT_STATUS, "unable to reach the server").with_code("CONNECT")
    }

    /// Any other transport failure.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(Self::TRANSPORT_STATUS, message).with_code("NETWORK")
    }

    /// Response body could not be understood.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(500, message).with_code("DECODE")
    }

    /// Builds an error from a non-success response body.
    ///
    /// Accepted shapes, in priority order for the message: `message`,
    /// `error` (string or `{ message, code }`), `detail`, `errors` (list of
    /// strings or `{ message | msg }`). Non-JSON bodies are used verbatim.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let trimmed = body.trim();

        let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
            if trimmed.is_empty() {
                return Self::new(status, default_message(status));
            }
            let message: String = trimmed.chars().take(MAX_PLAIN_BODY_LEN).collect();
            return Self::new(status, message);
        };

        let message = message_from(&value).unwrap_or_else(|| default_message(status));
        let mut error = Self::new(status, message);

        if let Some(code) = code_from(&value) {
            error = error.with_code(code);
        }

        if let Some(details) = value.get("details").or_else(|| value.get("errors")) {
            error = error.with_details(details.clone());
        }

        error
    }

    /// Returns user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns HTTP status, or `0` for transport failures.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns machine-readable code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns structured details.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Whether the request never reached the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        self.status == Self::TRANSPORT_STATUS
    }

    /// Whether the credentials were rejected.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Cross-origin or deployment misconfiguration, not actionable by the user.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        self.code.as_deref() == Some(CONFIGURATION_ERROR_CODE)
            || self.message.to_ascii_lowercase().contains("cors")
    }

    /// Whether the error should be surfaced as a toast.
    #[must_use]
    pub fn should_notify(&self) -> bool {
        !self.is_configuration_error()
    }
}

fn message_from(value: &Value) -> Option<String> {
    if let Some(message) = non_empty_str(value.get("message")) {
        return Some(message);
    }

    match value.get("error") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
        Some(nested @ Value::Object(_)) => {
            if let Some(message) = non_empty_str(nested.get("message")) {
                return Some(message);
            }
        }
        _ => {}
    }

    if let Some(detail) = non_empty_str(value.get("detail")) {
        return Some(detail);
    }

    let items = value.get("errors")?.as_array()?;
    let messages: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => {
                non_empty_str(item.get("message")).or_else(|| non_empty_str(item.get("msg")))
            }
            _ => None,
        })
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

fn code_from(value: &Value) -> Option<String> {
    non_empty_str(value.get("code"))
        .or_else(|| value.get("error").and_then(|e| non_empty_str(e.get("code"))))
        .or_else(|| non_empty_str(value.get("errorCode")))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn default_message(status: u16) -> String {
    match status {
        401 => "your session has expired, please sign in again".to_string(),
        403 => "you do not have permission to perform this action".to_string(),
        404 => "the requested resource was not found".to_string(),
        500..=599 => "the server encountered an error, please try again later".to_string(),
        _ => format!("HTTP {status}"),
    }
}
