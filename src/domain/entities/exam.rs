//! Examinations and their schedule slots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::serde_utils::string_or_number;

/// Kind of examination, sent as `QUIZ`, `MID_TERM`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamType {
    Quiz,
    MidTerm,
    Final,
    Assignment,
    Project,
}

impl ExamType {
    pub const ALL: [Self; 5] = [
        Self::Quiz,
        Self::MidTerm,
        Self::Final,
        Self::Assignment,
        Self::Project,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Quiz => "QUIZ",
            Self::MidTerm => "MID_TERM",
            Self::Final => "FINAL",
            Self::Assignment => "ASSIGNMENT",
            Self::Project => "PROJECT",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quiz => "Quiz",
            Self::MidTerm => "Mid-Term",
            Self::Final => "Final",
            Self::Assignment => "Assignment",
            Self::Project => "Project",
        }
    }

    /// Next variant, wrapping around.
    #[must_use]
    pub fn cycle(self, forward: bool) -> Self {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Self::ALL[next]
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExamType {
    type Err = String;

    /// Accepts wire (`MID_TERM`) and display (`Mid-Term`, `midterm`) forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "QUIZ" => Ok(Self::Quiz),
            "MIDTERM" => Ok(Self::MidTerm),
            "FINAL" => Ok(Self::Final),
            "ASSIGNMENT" => Ok(Self::Assignment),
            "PROJECT" => Ok(Self::Project),
            _ => Err(format!("unknown exam type: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicYear {
    #[serde(with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "yearName", alias = "label")]
    pub name: String,
    #[serde(default, alias = "isCurrent")]
    pub is_current: bool,
}

/// Examination as returned by the backend after creation or listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Examination {
    #[serde(with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "examName")]
    pub name: String,
    #[serde(default)]
    pub exam_type: Option<ExamType>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Client-local identifier of a schedule row; never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(Uuid);

impl SlotId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editable column of a schedule slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotField {
    Date,
    SubjectId,
    ClassId,
    StartTime,
    EndTime,
    Room,
}

impl SlotField {
    pub const ALL: [Self; 6] = [
        Self::Date,
        Self::SubjectId,
        Self::ClassId,
        Self::StartTime,
        Self::EndTime,
        Self::Room,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::SubjectId => "Subject",
            Self::ClassId => "Class",
            Self::StartTime => "Start",
            Self::EndTime => "End",
            Self::Room => "Room",
        }
    }
}

/// One row of the exam timetable while the wizard is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub id: SlotId,
    pub date: String,
    pub subject_id: String,
    pub class_id: String,
    pub start_time: String,
    pub end_time: String,
    pub room: String,
}

impl ScheduleSlot {
    /// Fresh slot with a new id and every field empty.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: SlotId::generate(),
            date: String::new(),
            subject_id: String::new(),
            class_id: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            room: String::new(),
        }
    }

    #[must_use]
    pub fn get(&self, field: SlotField) -> &str {
        match field {
            SlotField::Date => &self.date,
            SlotField::SubjectId => &self.subject_id,
            SlotField::ClassId => &self.class_id,
            SlotField::StartTime => &self.start_time,
            SlotField::EndTime => &self.end_time,
            SlotField::Room => &self.room,
        }
    }

    pub fn set(&mut self, field: SlotField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SlotField::Date => self.date = value,
            SlotField::SubjectId => self.subject_id = value,
            SlotField::ClassId => self.class_id = value,
            SlotField::StartTime => self.start_time = value,
            SlotField::EndTime => self.end_time = value,
            SlotField::Room => self.room = value,
        }
    }

    /// A row is submitted only when date, start and end are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.date, &self.start_time, &self.end_time]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("MID_TERM", ExamType::MidTerm ; "wire form")]
    #[test_case("Mid-Term", ExamType::MidTerm ; "label form")]
    #[test_case("quiz", ExamType::Quiz ; "lower case")]
    #[test_case("Project", ExamType::Project ; "title case")]
    fn test_exam_type_parsing(input: &str, expected: ExamType) {
        assert_eq!(input.parse::<ExamType>(), Ok(expected));
    }

    #[test]
    fn test_exam_type_serializes_to_wire_form() {
        let json = serde_json::to_string(&ExamType::MidTerm).unwrap();
        assert_eq!(json, r#""MID_TERM""#);
        assert_eq!(ExamType::MidTerm.as_wire(), "MID_TERM");
    }

    #[test]
    fn test_exam_type_cycle_wraps() {
        assert_eq!(ExamType::Project.cycle(true), ExamType::Quiz);
        assert_eq!(ExamType::Quiz.cycle(false), ExamType::Project);
    }

    #[test]
    fn test_empty_slot() {
        let a = ScheduleSlot::empty();
        let b = ScheduleSlot::empty();
        assert_ne!(a.id, b.id);
        assert!(SlotField::ALL.iter().all(|f| a.get(*f).is_empty()));
        assert!(!a.is_complete());
    }

    #[test]
    fn test_slot_completeness_ignores_optional_fields() {
        let mut slot = ScheduleSlot::empty();
        slot.set(SlotField::Date, "2024-03-01");
        slot.set(SlotField::StartTime, "09:00");
        assert!(!slot.is_complete());

        slot.set(SlotField::EndTime, "11:00");
        assert!(slot.is_complete());
    }
}
