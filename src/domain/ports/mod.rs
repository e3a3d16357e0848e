mod auth_port;
mod class_directory_port;
mod dashboard_port;
mod examination_port;
mod key_value_store_port;
mod student_port;

pub use auth_port::{AuthPayload, AuthPort, Credentials, PendingVerification, Portal, SchoolRegistration};
pub use class_directory_port::{ClassDirectoryPort, ClassLookup};
pub use dashboard_port::{DashboardPort, DashboardSummary};
pub use examination_port::{CreateExaminationRequest, ExamScheduleEntry, ExaminationPort};
pub use key_value_store_port::{KeyValueStorePort, StorageKey};
pub use student_port::{StudentPayload, StudentPort};
