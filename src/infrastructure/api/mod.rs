//! REST adapters for the school-management backend.

mod admin;
mod auth;
mod client;
mod dto;

pub use admin::HttpAdminApi;
pub use auth::HttpAuthApi;
pub use client::ApiClient;
pub use dto::unwrap_envelope;
