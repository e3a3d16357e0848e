pub mod class_section_cache;
pub mod exam_wizard;
pub mod notification_manager;
pub mod section_selection;
pub mod session_storage;
pub mod student_form;

pub use class_section_cache::{ClassResolution, ClassSectionCache};
pub use exam_wizard::{
    ExamDetails, ExamWizard, WizardError, WizardOptions, WizardStep, load_wizard_options,
};
pub use notification_manager::NotificationManager;
pub use section_selection::{rematch_existing, repair_selection};
pub use session_storage::SessionStorage;
pub use student_form::{EditorMode, StudentEditor, StudentForm, StudentFormError};
