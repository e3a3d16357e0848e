//! Class lookup port used by the cascading class/section pickers.

use async_trait::async_trait;

use crate::domain::entities::Section;
use crate::domain::errors::ApiError;

/// Result of a class lookup. `id` may be missing on legacy records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassLookup {
    pub id: Option<String>,
    pub name: String,
    pub sections: Vec<Section>,
}

/// Port for resolving classes and their sections.
#[async_trait]
pub trait ClassDirectoryPort: Send + Sync {
    /// Finds a class by its display name.
    async fn find_class_by_name(&self, name: &str) -> Result<Option<ClassLookup>, ApiError>;

    /// Fetches a class, including its sections, by id.
    async fn get_class(&self, id: &str) -> Result<ClassLookup, ApiError>;
}
