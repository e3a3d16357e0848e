//! Classes, sections and subjects.

use serde::{Deserialize, Serialize};

use crate::domain::serde_utils::string_or_number;

/// Sections offered when the backend cannot tell us a class's real sections.
pub const DEFAULT_SECTION_NAMES: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "subjectName")]
    pub name: String,
}

impl Subject {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "sectionName")]
    pub name: String,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Whether `value` refers to this section by id or by name.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        let value = value.trim();
        self.id == value || self.name.eq_ignore_ascii_case(value)
    }
}

/// A/B/C/D fallback; ids equal names.
#[must_use]
pub fn default_sections() -> Vec<Section> {
    DEFAULT_SECTION_NAMES
        .iter()
        .map(|name| Section::new(*name, *name))
        .collect()
}

/// Class as listed for the exam wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    #[serde(with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "className")]
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl ClassSummary {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subjects,
        }
    }
}

/// Resolved class identifier and its sections, cached per class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassData {
    pub class_uuid: String,
    pub sections: Vec<Section>,
}
