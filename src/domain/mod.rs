//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Toast notification model.
pub mod notification;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{SchoolId, TokenPair, UserProfile};
pub use errors::{ApiError, AuthError, StorageError, ValidationError};
pub use notification::{Notification, NotificationLevel};
pub use ports::{AuthPort, KeyValueStorePort};
