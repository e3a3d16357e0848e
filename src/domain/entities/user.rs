//! Signed-in user profile.

use serde::{Deserialize, Serialize};

use super::SchoolId;
use crate::domain::serde_utils::string_or_number;

/// Profile returned by the authentication endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(with = "string_or_number")]
    id: String,
    #[serde(default, alias = "fullName")]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default, alias = "schoolId")]
    school_id: Option<SchoolId>,
}

impl UserProfile {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: None,
            school_id: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_school(mut self, school_id: SchoolId) -> Self {
        self.school_id = Some(school_id);
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    #[must_use]
    pub const fn school_id(&self) -> Option<&SchoolId> {
        self.school_id.as_ref()
    }

    /// Name if present, otherwise email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_profile() {
        let json = r#"{"id": 7, "fullName": "Asha Verma", "email": "asha@school.test", "role": "ADMIN", "schoolId": 12}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(user.id(), "7");
        assert_eq!(user.display_name(), "Asha Verma");
        assert_eq!(user.school_id().map(SchoolId::as_str), Some("12"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = UserProfile::new("1", " ", "office@school.test");
        assert_eq!(user.display_name(), "office@school.test");
    }
}
