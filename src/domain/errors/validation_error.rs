//! Client-side validation errors, raised before any network call.

use thiserror::Error;

/// Validation error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please fill in the required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{field} is not a valid date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("end date must not be before start date")]
    EndBeforeStart,
}

impl ValidationError {
    /// Returns the missing field labels, if any.
    #[must_use]
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_enumerates_labels() {
        let error = ValidationError::MissingFields(vec!["Class", "Section"]);
        assert_eq!(
            error.to_string(),
            "please fill in the required fields: Class, Section"
        );
        assert_eq!(error.missing_fields(), ["Class", "Section"]);
    }
}
