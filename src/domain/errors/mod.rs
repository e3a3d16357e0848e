//! Domain error types.

mod api_error;
mod auth_error;
mod storage_error;
mod validation_error;

pub use api_error::ApiError;
pub use auth_error::AuthError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;
