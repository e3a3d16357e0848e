//! Student port definition.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::Student;
use crate::domain::errors::ApiError;

/// Body for creating or updating a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    /// Omitted when the class could not be resolved; the backend accepts the bare name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub section: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
}

/// Port for student records.
#[async_trait]
pub trait StudentPort: Send + Sync {
    async fn create_student(&self, payload: &StudentPayload) -> Result<Student, ApiError>;

    async fn update_student(&self, id: &str, payload: &StudentPayload)
    -> Result<Student, ApiError>;
}
