//! Class name → (class id, sections) resolution with caching and latest-wins ordering.
//!
//! Every call takes a generation from a monotonic counter and records itself
//! as the latest selection. When a lookup completes, its result is applied only
//! if no call for a *different* class has been made since; otherwise the
//! response is discarded without touching the cache. Concurrent calls for the
//! same name share one in-flight request.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{ClassData, Section, default_sections};
use crate::domain::ports::ClassDirectoryPort;

type SharedLookup = Shared<BoxFuture<'static, Option<ClassData>>>;

/// Outcome of resolving a class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassResolution {
    /// Class id and sections are known.
    Resolved(ClassData),
    /// Lookup failed or returned no id; the default sections apply.
    Unavailable,
    /// A newer selection of another class arrived first; ignore this one.
    Superseded,
}

impl ClassResolution {
    /// Sections to offer, or `None` when the result must be ignored.
    #[must_use]
    pub fn sections(&self) -> Option<Vec<Section>> {
        match self {
            Self::Resolved(data) => Some(data.sections.clone()),
            Self::Unavailable => Some(default_sections()),
            Self::Superseded => None,
        }
    }
}

#[derive(Debug)]
struct LatestSelection {
    generation: u64,
    class_name: String,
}

/// Per-dialog cache of class lookups.
pub struct ClassSectionCache {
    directory: Arc<dyn ClassDirectoryPort>,
    generation: AtomicU64,
    latest: Mutex<Option<LatestSelection>>,
    entries: Mutex<HashMap<String, ClassData>>,
    in_flight: Mutex<HashMap<String, SharedLookup>>,
}

impl ClassSectionCache {
    #[must_use]
    pub fn new(directory: Arc<dyn ClassDirectoryPort>) -> Self {
        Self {
            directory,
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves `class_name`, returning `None` on failure or when superseded.
    pub async fn load_class_data(&self, class_name: &str) -> Option<ClassData> {
        match self.resolve(class_name).await {
            ClassResolution::Resolved(data) => Some(data),
            ClassResolution::Unavailable | ClassResolution::Superseded => None,
        }
    }

    /// Resolves `class_name`, distinguishing failure from a superseded response.
    pub async fn resolve(&self, class_name: &str) -> ClassResolution {
        let generation = self.mark_latest(class_name);

        if let Some(hit) = self.cached(class_name) {
            debug!(class_name, "Class data served from cache");
            return ClassResolution::Resolved(hit);
        }

        let lookup = self.lookup_for(class_name);
        let result = lookup.clone().await;

        {
            let mut in_flight = self.in_flight.lock();
            if in_flight
                .get(class_name)
                .is_some_and(|current| current.ptr_eq(&lookup))
            {
                in_flight.remove(class_name);
            }
        }

        if !self.is_current(generation, class_name) {
            debug!(class_name, generation, "Discarding superseded class lookup");
            return ClassResolution::Superseded;
        }

        match result {
            Some(data) => {
                self.entries
                    .lock()
                    .insert(class_name.to_string(), data.clone());
                ClassResolution::Resolved(data)
            }
            None => ClassResolution::Unavailable,
        }
    }

    /// Cached entry, without any network call.
    #[must_use]
    pub fn cached(&self, class_name: &str) -> Option<ClassData> {
        self.entries.lock().get(class_name).cloned()
    }

    /// Drops all entries; called when the owning dialog closes.
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.in_flight.lock().clear();
        *self.latest.lock() = None;
    }

    fn mark_latest(&self, class_name: &str) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.latest.lock() = Some(LatestSelection {
            generation,
            class_name: class_name.to_string(),
        });
        generation
    }

    fn is_current(&self, generation: u64, class_name: &str) -> bool {
        self.latest
            .lock()
            .as_ref()
            .is_some_and(|latest| {
                latest.generation == generation || latest.class_name == class_name
            })
    }

    fn lookup_for(&self, class_name: &str) -> SharedLookup {
        let mut in_flight = self.in_flight.lock();
        if let Some(existing) = in_flight.get(class_name) {
            debug!(class_name, "Joining in-flight class lookup");
            return existing.clone();
        }

        let lookup = fetch_class_data(self.directory.clone(), class_name.to_string())
            .boxed()
            .shared();
        in_flight.insert(class_name.to_string(), lookup.clone());
        lookup
    }
}

async fn fetch_class_data(
    directory: Arc<dyn ClassDirectoryPort>,
    class_name: String,
) -> Option<ClassData> {
    let lookup = match directory.find_class_by_name(&class_name).await {
        Ok(Some(lookup)) => lookup,
        Ok(None) => {
            debug!(class_name = %class_name, "Class not found by name");
            return None;
        }
        Err(e) => {
            warn!(class_name = %class_name, error = %e, "Class lookup failed");
            return None;
        }
    };

    let Some(class_uuid) = lookup.id.filter(|id| !id.trim().is_empty()) else {
        debug!(class_name = %class_name, "Class lookup returned no id");
        return None;
    };

    if !lookup.sections.is_empty() {
        return Some(ClassData {
            class_uuid,
            sections: lookup.sections,
        });
    }

    let sections = match directory.get_class(&class_uuid).await {
        Ok(detail) if !detail.sections.is_empty() => detail.sections,
        Ok(_) => {
            debug!(class_name = %class_name, "Class has no sections, using defaults");
            default_sections()
        }
        Err(e) => {
            warn!(class_name = %class_name, error = %e, "Section lookup failed, using defaults");
            default_sections()
        }
    };

    Some(ClassData {
        class_uuid,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockClassDirectory;
    use std::time::Duration;

    fn names(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let directory =
            Arc::new(MockClassDirectory::new().with_class("Grade 5", Some("uuid-5"), &["A", "B"]));
        let cache = ClassSectionCache::new(directory.clone());

        let first = cache.load_class_data("Grade 5").await.unwrap();
        let second = cache.load_class_data("Grade 5").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.class_uuid, "uuid-5");
        assert_eq!(directory.name_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_share_one_request() {
        let directory = Arc::new(
            MockClassDirectory::new()
                .with_class("Grade 5", Some("uuid-5"), &["A"])
                .with_delay("Grade 5", Duration::from_millis(50)),
        );
        let cache = ClassSectionCache::new(directory.clone());

        let (a, b) = tokio::join!(cache.resolve("Grade 5"), cache.resolve("Grade 5"));

        assert!(matches!(a, ClassResolution::Resolved(_)));
        assert_eq!(a, b);
        assert_eq!(directory.name_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_for_previous_class_is_discarded() {
        let directory = Arc::new(
            MockClassDirectory::new()
                .with_class("Grade 1", Some("uuid-1"), &["A"])
                .with_class("Grade 2", Some("uuid-2"), &["X", "Y"])
                .with_delay("Grade 1", Duration::from_millis(100))
                .with_delay("Grade 2", Duration::from_millis(10)),
        );
        let cache = ClassSectionCache::new(directory);

        let (first, second) = tokio::join!(cache.resolve("Grade 1"), cache.resolve("Grade 2"));

        assert_eq!(first, ClassResolution::Superseded);
        let ClassResolution::Resolved(data) = second else {
            panic!("expected Grade 2 to resolve, got {second:?}");
        };
        assert_eq!(names(&data.sections), ["X", "Y"]);
        assert!(cache.cached("Grade 1").is_none());
        assert!(cache.cached("Grade 2").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_response_for_previous_class_is_discarded() {
        let directory = Arc::new(
            MockClassDirectory::new()
                .with_class("Grade 1", Some("uuid-1"), &["A"])
                .with_class("Grade 2", Some("uuid-2"), &["X"])
                .with_delay("Grade 1", Duration::from_millis(10))
                .with_delay("Grade 2", Duration::from_millis(100)),
        );
        let cache = ClassSectionCache::new(directory);

        let (first, second) = tokio::join!(cache.resolve("Grade 1"), cache.resolve("Grade 2"));

        assert_eq!(first, ClassResolution::Superseded);
        assert!(matches!(second, ClassResolution::Resolved(ref d) if d.class_uuid == "uuid-2"));
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_cached() {
        let directory = Arc::new(MockClassDirectory::new().failing_for("Grade 9"));
        let cache = ClassSectionCache::new(directory.clone());

        assert_eq!(cache.resolve("Grade 9").await, ClassResolution::Unavailable);
        assert!(cache.load_class_data("Grade 9").await.is_none());
        assert_eq!(directory.name_calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_uuid_is_unavailable() {
        let directory =
            Arc::new(MockClassDirectory::new().with_class("Nursery", None, &["Rose"]));
        let cache = ClassSectionCache::new(directory);

        let resolution = cache.resolve("Nursery").await;

        assert_eq!(resolution, ClassResolution::Unavailable);
        assert_eq!(
            names(&resolution.sections().unwrap()),
            ["A", "B", "C", "D"]
        );
    }

    #[tokio::test]
    async fn test_sections_fetched_by_id_when_not_embedded() {
        let directory = Arc::new(
            MockClassDirectory::new()
                .with_class("Grade 3", Some("uuid-3"), &[])
                .with_detail_sections("uuid-3", &["Red", "Blue"]),
        );
        let cache = ClassSectionCache::new(directory.clone());

        let data = cache.load_class_data("Grade 3").await.unwrap();

        assert_eq!(names(&data.sections), ["Red", "Blue"]);
        assert_eq!(directory.id_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_sections_when_none_anywhere() {
        let directory =
            Arc::new(MockClassDirectory::new().with_class("Grade 4", Some("uuid-4"), &[]));
        let cache = ClassSectionCache::new(directory);

        let data = cache.load_class_data("Grade 4").await.unwrap();

        assert_eq!(data.class_uuid, "uuid-4");
        assert_eq!(names(&data.sections), ["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let directory =
            Arc::new(MockClassDirectory::new().with_class("Grade 5", Some("uuid-5"), &["A"]));
        let cache = ClassSectionCache::new(directory.clone());

        cache.load_class_data("Grade 5").await;
        cache.clear();
        cache.load_class_data("Grade 5").await;

        assert_eq!(directory.name_calls(), 2);
    }

    #[test]
    fn test_superseded_has_no_sections() {
        assert!(ClassResolution::Superseded.sections().is_none());
    }
}
