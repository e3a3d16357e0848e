//! Examination port definition.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{AcademicYear, ClassSummary, ExamType, Examination};
use crate::domain::errors::ApiError;

/// One timetable row in a creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamScheduleEntry {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

/// Composite request built from all wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExaminationRequest {
    pub name: String,
    pub exam_type: ExamType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub class_ids: Vec<String>,
    pub subject_ids: Vec<String>,
    pub exam_schedules: Vec<ExamScheduleEntry>,
}

/// Port for examination management and the lookups the wizard needs.
#[async_trait]
pub trait ExaminationPort: Send + Sync {
    /// Lists classes with their subjects.
    async fn list_classes(&self) -> Result<Vec<ClassSummary>, ApiError>;

    /// Lists academic years.
    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>, ApiError>;

    /// Creates an examination in one request.
    async fn create_examination(
        &self,
        request: &CreateExaminationRequest,
    ) -> Result<Examination, ApiError>;

    /// Lists existing examinations.
    async fn list_examinations(&self) -> Result<Vec<Examination>, ApiError>;

    /// Deletes an examination.
    async fn delete_examination(&self, id: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::entities::Subject;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock examination port recording every creation request.
    pub struct MockExaminationPort {
        classes: Vec<ClassSummary>,
        fail_lookups: bool,
        fail_create: AtomicBool,
        pub created: Mutex<Vec<CreateExaminationRequest>>,
        pub create_calls: AtomicUsize,
        pub lookup_calls: AtomicUsize,
    }

    impl MockExaminationPort {
        /// Two classes; Grade 5 has Maths and Science, Grade 6 has Maths and History.
        pub fn new() -> Self {
            Self {
                classes: vec![
                    ClassSummary::new(
                        "c5",
                        "Grade 5",
                        vec![Subject::new("maths", "Maths"), Subject::new("sci", "Science")],
                    ),
                    ClassSummary::new(
                        "c6",
                        "Grade 6",
                        vec![Subject::new("maths", "Maths"), Subject::new("hist", "History")],
                    ),
                ],
                fail_lookups: false,
                fail_create: AtomicBool::new(false),
                created: Mutex::new(Vec::new()),
                create_calls: AtomicUsize::new(0),
                lookup_calls: AtomicUsize::new(0),
            }
        }

        pub fn with_failing_lookups(mut self) -> Self {
            self.fail_lookups = true;
            self
        }

        pub fn set_fail_create(&self, value: bool) {
            self.fail_create.store(value, Ordering::SeqCst);
        }

        pub fn create_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<CreateExaminationRequest> {
            self.created.lock().unwrap().last().cloned()
        }
    }

    impl Default for MockExaminationPort {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ExaminationPort for MockExaminationPort {
        async fn list_classes(&self) -> Result<Vec<ClassSummary>, ApiError> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_lookups {
                return Err(ApiError::new(500, "classes unavailable"));
            }
            Ok(self.classes.clone())
        }

        async fn list_academic_years(&self) -> Result<Vec<AcademicYear>, ApiError> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_lookups {
                return Err(ApiError::new(500, "years unavailable"));
            }
            Ok(vec![AcademicYear {
                id: "ay-2024".to_string(),
                name: "2024-2025".to_string(),
                is_current: true,
            }])
        }

        async fn create_examination(
            &self,
            request: &CreateExaminationRequest,
        ) -> Result<Examination, ApiError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(ApiError::new(409, "an exam with this name already exists"));
            }
            self.created.lock().unwrap().push(request.clone());
            Ok(Examination {
                id: "exam-1".to_string(),
                name: request.name.clone(),
                exam_type: Some(request.exam_type),
                start_date: Some(request.start_date.clone()),
                end_date: Some(request.end_date.clone()),
            })
        }

        async fn list_examinations(&self) -> Result<Vec<Examination>, ApiError> {
            Ok(Vec::new())
        }

        async fn delete_examination(&self, _id: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }
}
