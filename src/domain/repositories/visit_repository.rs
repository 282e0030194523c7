//! Repository trait for visit tracking and aggregation.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Aggregated visit counts for one time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitWindowStats {
    /// Number of distinct `ip` values.
    pub distinct_visitors: i64,
    /// Number of visit rows.
    pub visits: i64,
}

/// Repository interface for visit records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Records a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the referenced link does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn record(&self, new_visit: NewVisit) -> Result<Visit, AppError>;

    /// Aggregates visits with `from <= created_at < to`; `None` bounds are open.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn window_stats(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<VisitWindowStats, AppError>;
}
