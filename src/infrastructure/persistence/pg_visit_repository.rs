//! PostgreSQL implementation of the visit repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::{VisitRepository, VisitWindowStats};
use crate::error::AppError;

/// PostgreSQL repository for visit records and their monthly aggregates.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct VisitRow {
    id: i64,
    url_id: i64,
    ip: String,
    user_agent: String,
    referrer: String,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct WindowRow {
    distinct_visitors: i64,
    visits: i64,
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn record(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            INSERT INTO visits (url_id, ip, user_agent, referrer)
            VALUES ($1, $2, $3, $4)
            RETURNING id, url_id, ip, user_agent, referrer, created_at
            "#,
        )
        .bind(new_visit.url_id)
        .bind(&new_visit.ip)
        .bind(&new_visit.user_agent)
        .bind(&new_visit.referrer)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation())
            {
                AppError::bad_request(
                    "Short link no longer exists",
                    json!({ "url_id": new_visit.url_id }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(Visit::new(
            row.id,
            row.url_id,
            row.ip,
            row.user_agent,
            row.referrer,
            row.created_at,
        ))
    }

    async fn window_stats(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<VisitWindowStats, AppError> {
        let row = sqlx::query_as::<_, WindowRow>(
            r#"
            SELECT
                COUNT(DISTINCT ip) AS distinct_visitors,
                COUNT(*) AS visits
            FROM visits
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at < $2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(VisitWindowStats {
            distinct_visitors: row.distinct_visitors,
            visits: row.visits,
        })
    }
}
