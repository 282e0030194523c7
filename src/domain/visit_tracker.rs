//! Detached visit recording.
//!
//! The redirect handler must answer before the visit is persisted. Each visit
//! is written by its own spawned task that is never joined by the request:
//! at-most-once and best-effort. A failed write is logged and counted, never
//! retried and never reported to the visitor.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::entities::NewVisit;
use crate::domain::repositories::VisitRepository;

/// Spawns fire-and-forget visit writes.
#[derive(Clone)]
pub struct VisitTracker {
    repository: Arc<dyn VisitRepository>,
}

impl VisitTracker {
    pub fn new(repository: Arc<dyn VisitRepository>) -> Self {
        Self { repository }
    }

    /// Starts recording `visit` in the background and returns immediately.
    ///
    /// The handle is returned for tests and shutdown bookkeeping; request
    /// handlers drop it.
    pub fn track(&self, visit: NewVisit) -> JoinHandle<()> {
        let repository = Arc::clone(&self.repository);

        tokio::spawn(async move {
            record_visit(repository.as_ref(), visit).await;
        })
    }
}

/// Writes one visit; the error boundary of the detached task.
async fn record_visit(repository: &dyn VisitRepository, visit: NewVisit) {
    let url_id = visit.url_id;

    match repository.record(visit).await {
        Ok(recorded) => {
            metrics::counter!("visits_recorded_total").increment(1);
            debug!(url_id, visit_id = recorded.id, "Visit recorded");
        }
        Err(e) => {
            metrics::counter!("visits_failed_total").increment(1);
            warn!(url_id, error = %e, "Failed to record visit, dropping it");
        }
    }
}
