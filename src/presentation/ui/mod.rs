//! UI screens.

mod app;
mod exam_wizard_screen;
mod home_screen;
mod login_screen;
mod notification_popup;
mod student_form_screen;

pub use app::{App, AppOptions, AppPorts};
pub use exam_wizard_screen::{ExamWizardScreen, WizardAction};
pub use home_screen::{HomeAction, HomeScreen};
pub use login_screen::{LoginAction, LoginScreen, LoginState};
pub use notification_popup::NotificationPopup;
pub use student_form_screen::{StudentFormAction, StudentFormScreen};
