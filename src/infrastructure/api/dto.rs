//! Wire shapes and envelope handling.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{AccessToken, SchoolId, Section, TokenPair, UserProfile};
use crate::domain::errors::ApiError;
use crate::domain::ports::{AuthPayload, ClassLookup};
use crate::domain::serde_utils::string_or_number;

/// Decodes `T` from `{data: {items: T}}`, `{data: T}` or a bare `T`, in that order.
///
/// # Errors
/// Returns [`ApiError::decode`] when no candidate matches.
pub fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let data = value.get("data");
    let candidates = [data.and_then(|d| d.get("items")), data, Some(&value)];

    let mut last_error = None;
    for candidate in candidates.into_iter().flatten() {
        match T::deserialize(candidate) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => last_error = Some(e),
        }
    }

    Err(ApiError::decode(format!(
        "unexpected response shape: {}",
        last_error.map_or_else(|| "empty body".to_string(), |e| e.to_string())
    )))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokensDto {
    #[serde(default, alias = "token", alias = "access_token")]
    access_token: Option<String>,
    #[serde(default, alias = "refresh_token")]
    refresh_token: Option<String>,
}

/// Response of every authentication endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, alias = "admin")]
    user: Option<UserProfile>,
    #[serde(default, alias = "token", alias = "access_token")]
    access_token: Option<String>,
    #[serde(default, alias = "refresh_token")]
    refresh_token: Option<String>,
    #[serde(default)]
    tokens: Option<TokensDto>,
    #[serde(
        default,
        alias = "requires2FA",
        alias = "requiresTwoFactor",
        alias = "requiresOtp",
        alias = "twoFactorRequired"
    )]
    requires_verification: bool,
    #[serde(default, with = "string_or_number::option")]
    session_id: Option<String>,
    #[serde(default, with = "string_or_number::option")]
    user_id: Option<String>,
    #[serde(default, with = "string_or_number::option")]
    school_id: Option<String>,
}

impl From<AuthResponse> for AuthPayload {
    fn from(response: AuthResponse) -> Self {
        let nested = response.tokens.unwrap_or_default();
        let access = response.access_token.or(nested.access_token);
        let refresh = response.refresh_token.or(nested.refresh_token);
        let tokens = access.and_then(|access| {
            AccessToken::new(access).map(|access| {
                TokenPair::new(access, refresh.and_then(AccessToken::new))
            })
        });

        Self {
            user: response.user,
            tokens,
            school_id: response.school_id.and_then(SchoolId::new),
            requires_verification: response.requires_verification,
            session_id: response.session_id,
            user_id: response.user_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpBody<'a> {
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody<'a> {
    pub school_name: &'a str,
    pub admin_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub password: &'a str,
}

/// Class record from the class endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDto {
    #[serde(
        default,
        alias = "uuid",
        alias = "classId",
        alias = "_id",
        with = "string_or_number::option"
    )]
    pub id: Option<String>,
    #[serde(default, alias = "className")]
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl From<ClassDto> for ClassLookup {
    fn from(dto: ClassDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            sections: dto.sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AcademicYear;
    use serde_json::json;

    #[test]
    fn test_envelope_shapes() {
        let year = json!({"id": 7, "name": "2024-2025", "isCurrent": true});

        for body in [
            json!({"data": {"items": [year.clone()]}}),
            json!({"data": [year.clone()]}),
            json!([year.clone()]),
        ] {
            let years: Vec<AcademicYear> = unwrap_envelope(body).unwrap();
            assert_eq!(years[0].id, "7");
            assert!(years[0].is_current);
        }
    }

    #[test]
    fn test_envelope_mismatch_is_decode_error() {
        let result: Result<Vec<AcademicYear>, _> = unwrap_envelope(json!({"data": "nope"}));
        assert_eq!(result.unwrap_err().code(), Some("DECODE"));
    }

    #[test]
    fn test_auth_response_with_nested_tokens() {
        let body = json!({
            "user": {"id": 1, "fullName": "Ada", "email": "ada@hillside.test", "schoolId": "s-9"},
            "tokens": {"accessToken": "abc", "refreshToken": "def"}
        });

        let payload: AuthPayload = unwrap_envelope::<AuthResponse>(body).unwrap().into();

        let tokens = payload.tokens.unwrap();
        assert_eq!(tokens.access.as_str(), "abc");
        assert_eq!(tokens.refresh.unwrap().as_str(), "def");
        assert_eq!(payload.user.unwrap().school_id().unwrap().as_str(), "s-9");
        assert!(!payload.requires_verification);
    }

    #[test]
    fn test_auth_response_pending_otp() {
        let body = json!({"data": {"requires2FA": true, "sessionId": "otp-1", "userId": 42}});

        let payload: AuthPayload = unwrap_envelope::<AuthResponse>(body).unwrap().into();

        assert!(payload.requires_verification);
        assert_eq!(payload.session_id.as_deref(), Some("otp-1"));
        assert_eq!(payload.user_id.as_deref(), Some("42"));
        assert!(payload.tokens.is_none());
    }

    #[test]
    fn test_class_without_uuid() {
        let dto: ClassDto =
            serde_json::from_value(json!({"className": "Grade 5", "sections": []})).unwrap();
        let lookup = ClassLookup::from(dto);
        assert_eq!(lookup.id, None);
        assert_eq!(lookup.name, "Grade 5");
    }
}
