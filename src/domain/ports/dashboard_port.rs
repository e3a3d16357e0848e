//! Dashboard statistics port.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::errors::ApiError;

/// Aggregate counters shown on the home screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub total_teachers: u64,
    #[serde(default)]
    pub upcoming_exams: u64,
    #[serde(default, alias = "unreadCount")]
    pub unread_messages: u64,
    #[serde(default)]
    pub pending_fees: u64,
}

/// Port for dashboard aggregates.
#[async_trait]
pub trait DashboardPort: Send + Sync {
    /// Fetches the current summary.
    async fn summary(&self) -> Result<DashboardSummary, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Counts calls and reports the call number as unread messages.
    #[derive(Default)]
    pub struct MockDashboard {
        pub calls: AtomicU64,
    }

    #[async_trait]
    impl DashboardPort for MockDashboard {
        async fn summary(&self) -> Result<DashboardSummary, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(DashboardSummary {
                unread_messages: call,
                ..DashboardSummary::default()
            })
        }
    }
}
