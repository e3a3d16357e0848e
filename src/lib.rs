//! SchoolDesk - terminal administration console for a multi-tenant school service.
//!
//! The crate signs school staff in, keeps the session in the OS keyring or in
//! memory, talks to the school-management REST backend, and drives the
//! client-side workflows: the three-step examination wizard, the cascading
//! class/section selection and student form validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases, DTOs and client-side services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "schooldesk";
