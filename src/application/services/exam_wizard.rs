//! Three-step examination creation wizard.
//!
//! `Details → ClassesSubjects → Schedule → Submitting → Done | Error`.
//! The wizard itself performs no I/O apart from [`ExamWizard::submit`]; every
//! guard and the request builder are plain functions over its state.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::entities::{
    AcademicYear, ClassSummary, ExamType, Examination, ScheduleSlot, SlotField, SlotId, Subject,
};
use crate::domain::errors::{ApiError, ValidationError};
use crate::domain::ports::{CreateExaminationRequest, ExamScheduleEntry, ExaminationPort};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Details,
    ClassesSubjects,
    Schedule,
    Submitting,
    Done,
    Error,
}

impl WizardStep {
    /// 1-based number of the editing steps.
    #[must_use]
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Details => Some(1),
            Self::ClassesSubjects => Some(2),
            Self::Schedule | Self::Submitting | Self::Error => Some(3),
            Self::Done => None,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Details => "Exam Details",
            Self::ClassesSubjects => "Classes & Subjects",
            Self::Schedule => "Schedule",
            Self::Submitting => "Creating...",
            Self::Done => "Created",
            Self::Error => "Failed",
        }
    }
}

/// Wizard failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("please fill in the required fields: {}", .0.join(", "))]
    MissingDetails(Vec<&'static str>),

    #[error(transparent)]
    InvalidDetails(#[from] ValidationError),

    #[error("select at least one class and subject")]
    NothingSelected,

    #[error("cannot {action} from step {step:?}")]
    InvalidTransition {
        action: &'static str,
        step: WizardStep,
    },

    #[error("failed to create examination: {0}")]
    Submit(ApiError),
}

/// Step 1 values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamDetails {
    pub name: String,
    pub exam_type: Option<ExamType>,
    pub academic_year_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl ExamDetails {
    /// # Errors
    /// Returns missing required fields, then malformed or reversed dates.
    pub fn validate(&self) -> Result<(), WizardError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Exam Name");
        }
        if self.exam_type.is_none() {
            missing.push("Exam Type");
        }
        if self.start_date.trim().is_empty() {
            missing.push("Start Date");
        }
        if self.end_date.trim().is_empty() {
            missing.push("End Date");
        }
        if !missing.is_empty() {
            return Err(WizardError::MissingDetails(missing));
        }

        let start = parse_date("Start Date", &self.start_date)?;
        let end = parse_date("End Date", &self.end_date)?;
        if end < start {
            return Err(ValidationError::EndBeforeStart.into());
        }

        Ok(())
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.trim().to_string(),
        }
    })
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Lookup data loaded when the wizard opens.
#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    pub classes: Vec<ClassSummary>,
    pub academic_years: Vec<AcademicYear>,
    /// Lookups that failed and fell back to an empty list.
    pub failures: Vec<ApiError>,
}

/// Loads classes and academic years in parallel. Failures are not fatal.
pub async fn load_wizard_options(port: &dyn ExaminationPort) -> WizardOptions {
    let (classes, academic_years) = tokio::join!(port.list_classes(), port.list_academic_years());
    let mut failures = Vec::new();

    let classes = classes.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load classes for exam wizard");
        failures.push(e);
        Vec::new()
    });
    let academic_years = academic_years.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load academic years for exam wizard");
        failures.push(e);
        Vec::new()
    });

    debug!(
        classes = classes.len(),
        academic_years = academic_years.len(),
        "Exam wizard options loaded"
    );

    WizardOptions {
        classes,
        academic_years,
        failures,
    }
}

/// Exam creation wizard state.
#[derive(Debug, Clone)]
pub struct ExamWizard {
    step: WizardStep,
    details: ExamDetails,
    classes: Vec<ClassSummary>,
    academic_years: Vec<AcademicYear>,
    selected_classes: Vec<String>,
    selected_subjects: Vec<String>,
    slots: Vec<ScheduleSlot>,
    last_error: Option<String>,
    created: Option<Examination>,
}

impl ExamWizard {
    /// Opens on step 1 with one empty schedule row; the current academic year is preselected.
    #[must_use]
    pub fn new(options: WizardOptions) -> Self {
        let details = ExamDetails {
            academic_year_id: options
                .academic_years
                .iter()
                .find(|year| year.is_current)
                .map(|year| year.id.clone()),
            ..ExamDetails::default()
        };

        Self {
            step: WizardStep::Details,
            details,
            classes: options.classes,
            academic_years: options.academic_years,
            selected_classes: Vec::new(),
            selected_subjects: Vec::new(),
            slots: vec![ScheduleSlot::empty()],
            last_error: None,
            created: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub const fn details(&self) -> &ExamDetails {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut ExamDetails {
        &mut self.details
    }

    #[must_use]
    pub fn classes(&self) -> &[ClassSummary] {
        &self.classes
    }

    #[must_use]
    pub fn academic_years(&self) -> &[AcademicYear] {
        &self.academic_years
    }

    #[must_use]
    pub fn selected_class_ids(&self) -> &[String] {
        &self.selected_classes
    }

    #[must_use]
    pub fn selected_subject_ids(&self) -> &[String] {
        &self.selected_subjects
    }

    #[must_use]
    pub fn slots(&self) -> &[ScheduleSlot] {
        &self.slots
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub const fn created(&self) -> Option<&Examination> {
        self.created.as_ref()
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.step, WizardStep::Submitting)
    }

    fn fail<T>(&mut self, error: WizardError) -> Result<T, WizardError> {
        self.last_error = Some(error.to_string());
        Err(error)
    }

    /// Advances one step when the current step's guard passes.
    ///
    /// # Errors
    /// Returns the failed guard; the wizard stays where it was.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let next = match self.step {
            WizardStep::Details => {
                if let Err(e) = self.details.validate() {
                    return self.fail(e);
                }
                WizardStep::ClassesSubjects
            }
            WizardStep::ClassesSubjects => {
                if let Err(e) = self.ensure_selection() {
                    return self.fail(e);
                }
                WizardStep::Schedule
            }
            step => {
                return self.fail(WizardError::InvalidTransition {
                    action: "advance",
                    step,
                });
            }
        };

        self.step = next;
        self.last_error = None;
        Ok(next)
    }

    /// Goes back one step from step 2 or 3.
    ///
    /// # Errors
    /// Returns [`WizardError::InvalidTransition`] from any other step.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = match self.step {
            WizardStep::ClassesSubjects => WizardStep::Details,
            WizardStep::Schedule => WizardStep::ClassesSubjects,
            step => {
                return self.fail(WizardError::InvalidTransition {
                    action: "go back",
                    step,
                });
            }
        };

        self.step = previous;
        self.last_error = None;
        Ok(previous)
    }

    fn ensure_selection(&self) -> Result<(), WizardError> {
        if self.selected_classes.is_empty() || self.selected_subjects.is_empty() {
            Err(WizardError::NothingSelected)
        } else {
            Ok(())
        }
    }

    /// Subjects of the selected classes, deduplicated by id, in selection order.
    #[must_use]
    pub fn available_subjects(&self) -> Vec<&Subject> {
        let mut seen = std::collections::HashSet::new();
        self.selected_classes
            .iter()
            .filter_map(|id| self.classes.iter().find(|c| &c.id == id))
            .flat_map(|class| class.subjects.iter())
            .filter(|subject| seen.insert(subject.id.as_str()))
            .collect()
    }

    /// Selects or deselects a class. Subjects no longer offered are dropped.
    pub fn toggle_class(&mut self, class_id: &str) -> bool {
        if let Some(index) = self.selected_classes.iter().position(|id| id == class_id) {
            self.selected_classes.remove(index);
            self.prune_subjects();
            return true;
        }

        if self.classes.iter().any(|c| c.id == class_id) {
            self.selected_classes.push(class_id.to_string());
            return true;
        }

        false
    }

    /// Selects or deselects a subject offered by the selected classes.
    pub fn toggle_subject(&mut self, subject_id: &str) -> bool {
        if let Some(index) = self.selected_subjects.iter().position(|id| id == subject_id) {
            self.selected_subjects.remove(index);
            return true;
        }

        if self.available_subjects().iter().any(|s| s.id == subject_id) {
            self.selected_subjects.push(subject_id.to_string());
            return true;
        }

        false
    }

    fn prune_subjects(&mut self) {
        let offered: Vec<String> = self
            .available_subjects()
            .into_iter()
            .map(|s| s.id.clone())
            .collect();
        let before = self.selected_subjects.len();
        self.selected_subjects.retain(|id| offered.contains(id));

        if self.selected_subjects.len() != before {
            debug!(
                dropped = before - self.selected_subjects.len(),
                "Dropped subjects of deselected class"
            );
        }
    }

    /// Appends an empty row and returns its id.
    pub fn add_slot(&mut self) -> SlotId {
        let slot = ScheduleSlot::empty();
        let id = slot.id;
        self.slots.push(slot);
        id
    }

    /// Removes a row; refused when it is the only one left.
    pub fn remove_slot(&mut self, id: SlotId) -> bool {
        if self.slots.len() <= 1 {
            return false;
        }

        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    /// Replaces one field of one row.
    pub fn update_slot(&mut self, id: SlotId, field: SlotField, value: impl Into<String>) -> bool {
        match self.slots.iter_mut().find(|slot| slot.id == id) {
            Some(slot) => {
                slot.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Builds the creation request; incomplete rows are left out.
    ///
    /// # Errors
    /// Returns the first failing step 1 or step 2 guard.
    pub fn build_request(&self) -> Result<CreateExaminationRequest, WizardError> {
        self.details.validate()?;
        self.ensure_selection()?;

        let exam_type = self.details.exam_type.ok_or_else(|| {
            WizardError::MissingDetails(vec!["Exam Type"])
        })?;

        let exam_schedules = self
            .slots
            .iter()
            .filter(|slot| slot.is_complete())
            .map(|slot| ExamScheduleEntry {
                date: slot.date.trim().to_string(),
                subject_id: optional(&slot.subject_id),
                class_id: optional(&slot.class_id),
                start_time: slot.start_time.trim().to_string(),
                end_time: slot.end_time.trim().to_string(),
                room: optional(&slot.room),
            })
            .collect();

        Ok(CreateExaminationRequest {
            name: self.details.name.trim().to_string(),
            exam_type,
            academic_year_id: self.details.academic_year_id.clone(),
            start_date: self.details.start_date.trim().to_string(),
            end_date: self.details.end_date.trim().to_string(),
            description: optional(&self.details.description),
            class_ids: self.selected_classes.clone(),
            subject_ids: self.selected_subjects.clone(),
            exam_schedules,
        })
    }

    /// Validates and enters `Submitting`, returning the request to send.
    ///
    /// # Errors
    /// Returns a guard failure, or an invalid transition when not on the schedule step.
    pub fn begin_submit(&mut self) -> Result<CreateExaminationRequest, WizardError> {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => return self.fail(e),
        };

        if self.step != WizardStep::Schedule {
            let step = self.step;
            return self.fail(WizardError::InvalidTransition {
                action: "submit",
                step,
            });
        }

        self.step = WizardStep::Submitting;
        self.last_error = None;
        Ok(request)
    }

    /// Records the backend's answer to a submission.
    ///
    /// # Errors
    /// Returns [`WizardError::Submit`]; the wizard is left in `Error` with all data kept.
    pub fn finish_submit(
        &mut self,
        result: Result<Examination, ApiError>,
    ) -> Result<Examination, WizardError> {
        match result {
            Ok(exam) => {
                info!(exam_id = %exam.id, name = %exam.name, "Examination created");
                self.step = WizardStep::Done;
                self.created = Some(exam.clone());
                Ok(exam)
            }
            Err(e) => {
                warn!(error = %e, "Examination creation failed");
                self.step = WizardStep::Error;
                self.fail(WizardError::Submit(e))
            }
        }
    }

    /// After a failed submit, returns to the schedule step with everything intact.
    pub fn return_to_schedule(&mut self) {
        if self.step == WizardStep::Error {
            self.step = WizardStep::Schedule;
        }
    }

    /// Submits through `port`.
    ///
    /// # Errors
    /// Returns guard failures without any network call, or the submission error.
    pub async fn submit(&mut self, port: &dyn ExaminationPort) -> Result<Examination, WizardError> {
        let request = self.begin_submit()?;
        let result = port.create_examination(&request).await;
        self.finish_submit(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockExaminationPort;

    async fn open(port: &MockExaminationPort) -> ExamWizard {
        ExamWizard::new(load_wizard_options(port).await)
    }

    fn fill_details(wizard: &mut ExamWizard) {
        let details = wizard.details_mut();
        details.name = "Mid-Term Examination".to_string();
        details.exam_type = Some("MID_TERM".parse().unwrap());
        details.start_date = "2024-03-01".to_string();
        details.end_date = "2024-03-10".to_string();
    }

    async fn on_schedule_step(port: &MockExaminationPort) -> ExamWizard {
        let mut wizard = open(port).await;
        fill_details(&mut wizard);
        wizard.next().unwrap();
        wizard.toggle_class("c5");
        wizard.toggle_subject("maths");
        wizard.toggle_subject("sci");
        wizard.next().unwrap();
        wizard
    }

    #[tokio::test]
    async fn test_details_guard() {
        let port = MockExaminationPort::new();
        let mut wizard = open(&port).await;

        wizard.details_mut().name = "Unit Test".to_string();
        let err = wizard.next().unwrap_err();

        assert_eq!(
            err,
            WizardError::MissingDetails(vec!["Exam Type", "Start Date", "End Date"])
        );
        assert_eq!(wizard.step(), WizardStep::Details);
        assert!(wizard.last_error().is_some());
    }

    #[tokio::test]
    async fn test_details_date_checks() {
        let port = MockExaminationPort::new();
        let mut wizard = open(&port).await;
        fill_details(&mut wizard);

        wizard.details_mut().end_date = "2024-02-01".to_string();
        assert_eq!(
            wizard.next(),
            Err(WizardError::InvalidDetails(ValidationError::EndBeforeStart))
        );
        assert_eq!(
            wizard.last_error(),
            Some("end date must not be before start date")
        );

        wizard.details_mut().end_date = "10/03/2024".to_string();
        assert!(matches!(
            wizard.next(),
            Err(WizardError::InvalidDetails(ValidationError::InvalidDate { field: "End Date", .. }))
        ));
        let message = wizard.last_error().unwrap_or_default();
        assert_eq!(message, "End Date is not a valid date: 10/03/2024");
        assert!(!message.contains("required fields"));
    }

    #[tokio::test]
    async fn test_full_walkthrough_with_empty_schedule() {
        let port = MockExaminationPort::new();
        let mut wizard = open(&port).await;

        fill_details(&mut wizard);
        assert_eq!(wizard.next(), Ok(WizardStep::ClassesSubjects));

        let err = wizard.next().unwrap_err();
        assert_eq!(err.to_string(), "select at least one class and subject");
        assert_eq!(wizard.step(), WizardStep::ClassesSubjects);

        assert!(wizard.toggle_class("c5"));
        assert!(wizard.toggle_subject("maths"));
        assert!(wizard.toggle_subject("sci"));
        assert_eq!(wizard.next(), Ok(WizardStep::Schedule));

        let exam = wizard.submit(&port).await.unwrap();

        assert_eq!(exam.name, "Mid-Term Examination");
        assert_eq!(wizard.step(), WizardStep::Done);
        let request = port.last_request().unwrap();
        assert!(request.exam_schedules.is_empty());
        assert_eq!(request.class_ids, ["c5"]);
        assert_eq!(request.subject_ids, ["maths", "sci"]);
        assert_eq!(request.academic_year_id.as_deref(), Some("ay-2024"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["examSchedules"], serde_json::json!([]));
        assert_eq!(json["examType"], "MID_TERM");
    }

    #[tokio::test]
    async fn test_submit_without_selection_makes_no_call() {
        let port = MockExaminationPort::new();
        let mut wizard = open(&port).await;
        fill_details(&mut wizard);
        wizard.next().unwrap();

        let result = wizard.submit(&port).await;

        assert_eq!(result, Err(WizardError::NothingSelected));
        assert_eq!(port.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_with_class_but_no_subject_makes_no_call() {
        let port = MockExaminationPort::new();
        let mut wizard = open(&port).await;
        fill_details(&mut wizard);
        wizard.next().unwrap();
        wizard.toggle_class("c6");

        assert_eq!(wizard.submit(&port).await, Err(WizardError::NothingSelected));
        assert_eq!(port.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_rows_filtered() {
        let port = MockExaminationPort::new();
        let mut wizard = on_schedule_step(&port).await;

        let first = wizard.slots()[0].id;
        wizard.update_slot(first, SlotField::Date, "2024-03-02");
        wizard.update_slot(first, SlotField::StartTime, "09:00");
        wizard.update_slot(first, SlotField::EndTime, "11:00");
        wizard.update_slot(first, SlotField::SubjectId, "maths");
        wizard.update_slot(first, SlotField::ClassId, "c5");

        let partial = wizard.add_slot();
        wizard.update_slot(partial, SlotField::Date, "2024-03-03");

        let request = wizard.build_request().unwrap();

        assert_eq!(request.exam_schedules.len(), 1);
        let entry = &request.exam_schedules[0];
        assert_eq!(entry.subject_id.as_deref(), Some("maths"));
        assert_eq!(entry.room, None);
    }

    #[test]
    fn test_last_slot_cannot_be_removed() {
        let mut wizard = ExamWizard::new(WizardOptions::default());
        let only = wizard.slots()[0].id;

        assert!(!wizard.remove_slot(only));
        assert_eq!(wizard.slots().len(), 1);

        let second = wizard.add_slot();
        assert!(wizard.remove_slot(only));
        assert!(!wizard.remove_slot(second));
        assert_eq!(wizard.slots().len(), 1);
        assert_eq!(wizard.slots()[0].id, second);
    }

    #[test]
    fn test_update_slot_touches_one_field() {
        let mut wizard = ExamWizard::new(WizardOptions::default());
        let a = wizard.slots()[0].id;
        let b = wizard.add_slot();

        assert!(wizard.update_slot(b, SlotField::Room, "Hall 2"));

        assert_eq!(wizard.slots()[1].room, "Hall 2");
        assert_eq!(wizard.slots()[1].date, "");
        assert_eq!(wizard.slots()[0].room, "");
        assert_eq!(wizard.slots()[0].id, a);
        assert!(!wizard.update_slot(SlotId::generate(), SlotField::Room, "x"));
    }

    #[tokio::test]
    async fn test_subjects_union_and_pruning() {
        let port = MockExaminationPort::new();
        let mut wizard = open(&port).await;

        wizard.toggle_class("c5");
        wizard.toggle_class("c6");
        let offered: Vec<_> = wizard.available_subjects().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(offered, ["maths", "sci", "hist"]);

        wizard.toggle_subject("maths");
        wizard.toggle_subject("hist");
        wizard.toggle_class("c6");

        assert_eq!(wizard.selected_subject_ids(), ["maths"]);
        assert!(!wizard.toggle_subject("hist"));
        assert!(!wizard.toggle_class("missing"));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_data() {
        let port = MockExaminationPort::new();
        let mut wizard = on_schedule_step(&port).await;
        let slot = wizard.slots()[0].id;
        wizard.update_slot(slot, SlotField::Room, "Lab 1");
        port.set_fail_create(true);

        let err = wizard.submit(&port).await.unwrap_err();

        assert!(matches!(err, WizardError::Submit(ref e) if e.status() == 409));
        assert_eq!(wizard.step(), WizardStep::Error);
        assert!(wizard.last_error().unwrap().contains("already exists"));

        wizard.return_to_schedule();
        assert_eq!(wizard.step(), WizardStep::Schedule);
        assert_eq!(wizard.slots()[0].room, "Lab 1");
        assert_eq!(wizard.details().name, "Mid-Term Examination");

        port.set_fail_create(false);
        assert!(wizard.submit(&port).await.is_ok());
        assert_eq!(port.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_back_navigation() {
        let port = MockExaminationPort::new();
        let mut wizard = on_schedule_step(&port).await;

        assert_eq!(wizard.back(), Ok(WizardStep::ClassesSubjects));
        assert_eq!(wizard.back(), Ok(WizardStep::Details));
        assert!(wizard.back().is_err());
        assert_eq!(wizard.details().name, "Mid-Term Examination");
    }

    #[tokio::test]
    async fn test_lookup_failures_fall_back_to_empty_lists() {
        let port = MockExaminationPort::new().with_failing_lookups();

        let options = load_wizard_options(&port).await;

        assert!(options.classes.is_empty());
        assert!(options.academic_years.is_empty());
        assert_eq!(options.failures.len(), 2);

        let wizard = ExamWizard::new(options);
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.details().academic_year_id, None);
    }
}
