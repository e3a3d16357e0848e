//! Admin endpoints: examinations, classes, students, dashboard.

use async_trait::async_trait;
use tracing::{debug, info};

use super::client::ApiClient;
use super::dto::ClassDto;
use crate::domain::entities::{AcademicYear, ClassSummary, Examination, RawStudentRecord, Student};
use crate::domain::errors::ApiError;
use crate::domain::ports::{
    ClassDirectoryPort, ClassLookup, CreateExaminationRequest, DashboardPort, DashboardSummary,
    ExaminationPort, StudentPayload, StudentPort,
};

/// Admin ports over HTTP.
#[derive(Clone)]
pub struct HttpAdminApi {
    client: ApiClient,
}

impl HttpAdminApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Exact name first, then case-insensitive.
fn pick_class(classes: Vec<ClassDto>, name: &str) -> Option<ClassDto> {
    let name = name.trim();
    let index = classes
        .iter()
        .position(|c| c.name == name)
        .or_else(|| classes.iter().position(|c| c.name.eq_ignore_ascii_case(name)))?;
    classes.into_iter().nth(index)
}

#[async_trait]
impl ExaminationPort for HttpAdminApi {
    async fn list_classes(&self) -> Result<Vec<ClassSummary>, ApiError> {
        self.client.get("classes").await
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>, ApiError> {
        self.client.get("academic-years").await
    }

    async fn create_examination(
        &self,
        request: &CreateExaminationRequest,
    ) -> Result<Examination, ApiError> {
        let exam: Examination = self.client.post("examinations", request).await?;
        info!(exam_id = %exam.id, "Examination created on server");
        Ok(exam)
    }

    async fn list_examinations(&self) -> Result<Vec<Examination>, ApiError> {
        self.client.get("examinations").await
    }

    async fn delete_examination(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("examinations/{id}")).await
    }
}

#[async_trait]
impl ClassDirectoryPort for HttpAdminApi {
    async fn find_class_by_name(&self, name: &str) -> Result<Option<ClassLookup>, ApiError> {
        let classes: Vec<ClassDto> = self
            .client
            .get_with_query("classes", &[("name", name)])
            .await?;
        debug!(name, matches = classes.len(), "Class lookup by name");
        Ok(pick_class(classes, name).map(ClassLookup::from))
    }

    async fn get_class(&self, id: &str) -> Result<ClassLookup, ApiError> {
        let class: ClassDto = self.client.get(&format!("classes/{id}")).await?;
        Ok(class.into())
    }
}

#[async_trait]
impl StudentPort for HttpAdminApi {
    async fn create_student(&self, payload: &StudentPayload) -> Result<Student, ApiError> {
        let raw: RawStudentRecord = self.client.post("students", payload).await?;
        Ok(raw.into())
    }

    async fn update_student(
        &self,
        id: &str,
        payload: &StudentPayload,
    ) -> Result<Student, ApiError> {
        let raw: RawStudentRecord = self.client.put(&format!("students/{id}"), payload).await?;
        Ok(raw.into())
    }
}

#[async_trait]
impl DashboardPort for HttpAdminApi {
    async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        self.client.get("dashboard/stats").await
    }
}
