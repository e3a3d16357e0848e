//! Add/edit student form: validation, cascading class/section state and submission.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::class_section_cache::{ClassResolution, ClassSectionCache};
use super::section_selection::{rematch_existing, repair_selection};
use crate::domain::entities::{Section, Student, default_sections};
use crate::domain::errors::{ApiError, ValidationError};
use crate::domain::ports::{StudentPayload, StudentPort};

/// Submission failure.
#[derive(Debug, Error)]
pub enum StudentFormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw form values, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub section: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub date_of_birth: String,
    pub guardian_name: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl StudentForm {
    /// Prefills the form from an existing student.
    #[must_use]
    pub fn from_student(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            class_name: student.class_name.clone().unwrap_or_default(),
            section: student.section.clone().unwrap_or_default(),
            phone: student.phone.clone(),
            address: student.address.clone(),
            email: student.email.clone().unwrap_or_default(),
            date_of_birth: student.date_of_birth.clone().unwrap_or_default(),
            guardian_name: student.guardian_name.clone().unwrap_or_default(),
        }
    }

    /// Labels of empty required fields, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("First Name", &self.first_name),
            ("Last Name", &self.last_name),
            ("Class", &self.class_name),
            ("Section", &self.section),
            ("Phone", &self.phone),
            ("Address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// # Errors
    /// Returns [`ValidationError::MissingFields`] listing every empty required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    /// Builds the request body.
    ///
    /// # Errors
    /// Returns validation error if a required field is empty.
    pub fn to_payload(&self, class_id: Option<String>) -> Result<StudentPayload, ValidationError> {
        self.validate()?;

        Ok(StudentPayload {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            class_name: self.class_name.trim().to_string(),
            class_id,
            section: self.section.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            email: optional(&self.email),
            date_of_birth: optional(&self.date_of_birth),
            guardian_name: optional(&self.guardian_name),
        })
    }
}

/// Whether the editor creates or updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit {
        student_id: String,
        original_section: Option<String>,
    },
}

/// Form state plus the dependent section list of the selected class.
pub struct StudentEditor {
    form: StudentForm,
    mode: EditorMode,
    sections: Vec<Section>,
    class_id: Option<String>,
    cache: Arc<ClassSectionCache>,
}

impl StudentEditor {
    /// Empty add form offering the default sections.
    #[must_use]
    pub fn add(cache: Arc<ClassSectionCache>) -> Self {
        Self {
            form: StudentForm::default(),
            mode: EditorMode::Add,
            sections: default_sections(),
            class_id: None,
            cache,
        }
    }

    /// Edit form prefilled from `student`.
    #[must_use]
    pub fn edit(cache: Arc<ClassSectionCache>, student: &Student) -> Self {
        Self {
            form: StudentForm::from_student(student),
            mode: EditorMode::Edit {
                student_id: student.id.clone().unwrap_or_default(),
                original_section: student.section.clone(),
            },
            sections: default_sections(),
            class_id: student.class_id.clone(),
            cache,
        }
    }

    #[must_use]
    pub const fn form(&self) -> &StudentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut StudentForm {
        &mut self.form
    }

    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn class_id(&self) -> Option<&str> {
        self.class_id.as_deref()
    }

    /// Records the newly chosen class before its sections are known.
    ///
    /// A blank name clears the class and falls back to the default sections.
    pub fn begin_class_change(&mut self, class_name: &str) {
        self.form.class_name = class_name.trim().to_string();
        self.class_id = None;

        if self.form.class_name.is_empty() {
            self.sections = default_sections();
            self.repair_section();
        }
    }

    /// Applies a resolution for `class_name`; returns `false` when it was ignored.
    pub fn apply_class_resolution(&mut self, class_name: &str, resolution: &ClassResolution) -> bool {
        if self.form.class_name != class_name.trim() {
            debug!(class_name, "Ignoring sections for a class that is no longer selected");
            return false;
        }

        let Some(sections) = resolution.sections() else {
            return false;
        };

        self.class_id = match resolution {
            ClassResolution::Resolved(data) => Some(data.class_uuid.clone()),
            _ => None,
        };
        self.sections = sections;
        self.repair_section();
        true
    }

    /// Selects a class and loads its sections.
    pub async fn select_class(&mut self, class_name: &str) {
        self.begin_class_change(class_name);
        if self.form.class_name.is_empty() {
            return;
        }
        let resolution = self.cache.resolve(self.form.class_name.trim()).await;
        let selected = self.form.class_name.clone();
        self.apply_class_resolution(&selected, &resolution);
    }

    /// Chooses a section; only sections of the selected class are accepted.
    pub fn select_section(&mut self, value: &str) -> bool {
        match self.sections.iter().find(|s| s.matches(value)) {
            Some(section) => {
                self.form.section = section.name.clone();
                true
            }
            None => false,
        }
    }

    /// Moves the section choice to the next or previous offered section.
    pub fn cycle_section(&mut self, forward: bool) {
        if self.sections.is_empty() {
            return;
        }

        let len = self.sections.len();
        let next = match self
            .sections
            .iter()
            .position(|s| s.matches(&self.form.section))
        {
            Some(index) if forward => (index + 1) % len,
            Some(index) => (index + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.form.section = self.sections[next].name.clone();
    }

    fn repair_section(&mut self) {
        let current = Some(self.form.section.as_str());
        let repaired = repair_selection(current, &self.sections).or_else(|| match &self.mode {
            EditorMode::Edit {
                original_section: Some(original),
                ..
            } => rematch_existing(original, &self.sections),
            _ => None,
        });

        if repaired.is_none() && !self.form.section.trim().is_empty() {
            debug!(section = %self.form.section, "Clearing section not offered by the new class");
        }
        self.form.section = repaired.unwrap_or_default();
    }

    /// Validated request body for the current form.
    ///
    /// # Errors
    /// Returns the missing required fields.
    pub fn payload(&self) -> Result<StudentPayload, ValidationError> {
        self.form.to_payload(self.class_id.clone()).map_err(|e| {
            debug!(error = %e, "Student form incomplete");
            e
        })
    }

    /// Sends `payload` as a create or an update depending on the mode.
    ///
    /// # Errors
    /// Returns the API error.
    pub async fn save(
        mode: &EditorMode,
        payload: &StudentPayload,
        port: &dyn StudentPort,
    ) -> Result<Student, ApiError> {
        let result = match mode {
            EditorMode::Add => port.create_student(payload).await,
            EditorMode::Edit { student_id, .. } => port.update_student(student_id, payload).await,
        };

        match &result {
            Ok(student) => info!(student_id = ?student.id, "Student saved"),
            Err(e) => warn!(error = %e, "Failed to save student"),
        }
        result
    }

    /// Validates locally, then creates or updates the student.
    ///
    /// # Errors
    /// Returns validation error without any network call, or the API error.
    pub async fn submit(&self, port: &dyn StudentPort) -> Result<Student, StudentFormError> {
        let payload = self.payload()?;
        Ok(Self::save(&self.mode, &payload, port).await?)
    }
}
