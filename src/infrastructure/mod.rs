//! Infrastructure layer with external service adapters.

/// REST adapters.
pub mod api;
/// Application configuration.
pub mod config;
/// Background refresh.
pub mod polling;
/// Key/value store adapters.
pub mod storage;

pub use api::{ApiClient, HttpAdminApi, HttpAuthApi};
pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use polling::Poller;
pub use storage::{KeyringStore, MemoryStore};
