//! Application layer with use cases, DTOs and client-side services.

/// Data transfer objects.
pub mod dto;
/// Client-side orchestration services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginOutcome, LoginRequest, Session};
pub use use_cases::{LoginUseCase, RestoreSessionUseCase, VerifyOtpUseCase};
