//! Students and the adapter that normalizes the backend's inconsistent student records.
//!
//! The backend reports a student's class in three places, depending on which
//! endpoint produced the record: `currentClass.className`, `className` or
//! `class` (either a plain name or an object). [`RawStudentRecord::class_name`]
//! is the only place that knows about this; everything else works with
//! [`Student`].

use serde::{Deserialize, Serialize};

use crate::domain::serde_utils::string_or_number;

/// `class` field: either a bare name or an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ClassRef {
    Named(String),
    Detailed(CurrentClass),
}

/// Class object as embedded in student records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentClass {
    #[serde(default, alias = "id", with = "string_or_number::option")]
    pub class_id: Option<String>,
    #[serde(default, alias = "name")]
    pub class_name: Option<String>,
}

/// `section` field: either a bare name or an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SectionRef {
    Named(String),
    Detailed {
        #[serde(default, alias = "sectionName")]
        name: Option<String>,
    },
}

/// Student exactly as the server sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStudentRecord {
    #[serde(default, alias = "_id", alias = "studentId", with = "string_or_number::option")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, alias = "fullName")]
    pub name: Option<String>,
    #[serde(default, rename = "class")]
    pub class_ref: Option<ClassRef>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub current_class: Option<CurrentClass>,
    #[serde(default)]
    pub section: Option<SectionRef>,
    #[serde(default)]
    pub section_name: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "dob")]
    pub date_of_birth: Option<String>,
    #[serde(default, alias = "parentName")]
    pub guardian_name: Option<String>,
}

fn present(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from)
}

impl RawStudentRecord {
    /// Class display name, by priority: `currentClass.className`, `className`, `class`.
    #[must_use]
    pub fn class_name(&self) -> Option<String> {
        if let Some(name) = present(
            self.current_class
                .as_ref()
                .and_then(|c| c.class_name.as_ref()),
        ) {
            return Some(name);
        }

        if let Some(name) = present(self.class_name.as_ref()) {
            return Some(name);
        }

        match &self.class_ref {
            Some(ClassRef::Named(name)) => present(Some(name)),
            Some(ClassRef::Detailed(class)) => present(class.class_name.as_ref()),
            None => None,
        }
    }

    /// Class identifier when any of the shapes carried one.
    #[must_use]
    pub fn class_id(&self) -> Option<String> {
        self.current_class
            .as_ref()
            .and_then(|c| c.class_id.clone())
            .or_else(|| match &self.class_ref {
                Some(ClassRef::Detailed(class)) => class.class_id.clone(),
                _ => None,
            })
    }

    /// Section name from `section` or `sectionName`.
    #[must_use]
    pub fn section_name(&self) -> Option<String> {
        let from_section = match &self.section {
            Some(SectionRef::Named(name)) => present(Some(name)),
            Some(SectionRef::Detailed { name }) => present(name.as_ref()),
            None => None,
        };
        from_section.or_else(|| present(self.section_name.as_ref()))
    }

    fn names(&self) -> (String, String) {
        let first = present(self.first_name.as_ref());
        let last = present(self.last_name.as_ref());

        if first.is_some() || last.is_some() {
            return (first.unwrap_or_default(), last.unwrap_or_default());
        }

        let full = present(self.name.as_ref()).unwrap_or_default();
        match full.split_once(char::is_whitespace) {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (full, String::new()),
        }
    }
}

/// Normalized student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub class_name: Option<String>,
    pub class_id: Option<String>,
    pub section: Option<String>,
    pub phone: String,
    pub address: String,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub guardian_name: Option<String>,
}

impl From<RawStudentRecord> for Student {
    fn from(raw: RawStudentRecord) -> Self {
        let (first_name, last_name) = raw.names();

        Self {
            class_name: raw.class_name(),
            class_id: raw.class_id(),
            section: raw.section_name(),
            first_name,
            last_name,
            id: raw.id,
            phone: present(raw.phone.as_ref()).unwrap_or_default(),
            address: present(raw.address.as_ref()).unwrap_or_default(),
            email: present(raw.email.as_ref()),
            date_of_birth: present(raw.date_of_birth.as_ref()),
            guardian_name: present(raw.guardian_name.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn parse(json: &str) -> RawStudentRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test_case(r#"{"currentClass": {"className": "Grade 7"}, "className": "Grade 6", "class": "Grade 5"}"#, Some("Grade 7") ; "current class wins")]
    #[test_case(r#"{"className": "Grade 6", "class": "Grade 5"}"#, Some("Grade 6") ; "class name over class")]
    #[test_case(r#"{"class": "Grade 5"}"#, Some("Grade 5") ; "plain class string")]
    #[test_case(r#"{"class": {"name": "Grade 4", "id": 9}}"#, Some("Grade 4") ; "class object")]
    #[test_case(r#"{"currentClass": {"className": "  "}, "class": "Grade 3"}"#, Some("Grade 3") ; "blank values skipped")]
    #[test_case(r#"{}"#, None ; "no class at all")]
    fn test_class_name_priority(json: &str, expected: Option<&str>) {
        assert_eq!(parse(json).class_name().as_deref(), expected);
    }

    #[test]
    fn test_class_id_from_object() {
        let raw = parse(r#"{"class": {"name": "Grade 4", "id": 9}}"#);
        assert_eq!(raw.class_id().as_deref(), Some("9"));
    }

    #[test]
    fn test_section_shapes() {
        assert_eq!(parse(r#"{"section": "B"}"#).section_name().as_deref(), Some("B"));
        assert_eq!(
            parse(r#"{"section": {"sectionName": "C"}}"#).section_name().as_deref(),
            Some("C")
        );
        assert_eq!(parse(r#"{"sectionName": "D"}"#).section_name().as_deref(), Some("D"));
    }

    #[test]
    fn test_full_name_split() {
        let student = Student::from(parse(r#"{"_id": 5, "name": "Ravi Kumar Singh"}"#));
        assert_eq!(student.id.as_deref(), Some("5"));
        assert_eq!(student.first_name, "Ravi");
        assert_eq!(student.last_name, "Kumar Singh");
    }

    #[test]
    fn test_normalized_student() {
        let raw = parse(
            r#"{"id": "s-1", "firstName": "Mira", "lastName": "Das", "className": "Grade 2",
                "section": "A", "phoneNumber": "98765", "address": "12 Lake Rd", "email": ""}"#,
        );
        let student = Student::from(raw);

        assert_eq!(student.class_name.as_deref(), Some("Grade 2"));
        assert_eq!(student.section.as_deref(), Some("A"));
        assert_eq!(student.phone, "98765");
        assert_eq!(student.email, None);
    }
}
