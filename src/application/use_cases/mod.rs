//! Use case implementations.

mod login_use_case;
mod restore_session_use_case;
mod verify_otp_use_case;

pub use login_use_case::LoginUseCase;
pub use restore_session_use_case::RestoreSessionUseCase;
pub use verify_otp_use_case::VerifyOtpUseCase;
