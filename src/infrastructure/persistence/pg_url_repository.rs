//! PostgreSQL implementation of the url repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUrl, Owner, Url, UrlWithVisits};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::db_error::is_short_code_collision;

/// PostgreSQL repository for short links.
///
/// The short code is protected by the `urls_short_code_key` unique constraint,
/// so concurrent inserts of the same code resolve in the database.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UrlRow {
    id: i64,
    short_code: String,
    long_url: String,
    user_id: Option<String>,
    guest_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for Url {
    fn from(r: UrlRow) -> Self {
        Url::new(
            r.id,
            r.short_code,
            r.long_url,
            r.user_id,
            r.guest_token,
            r.created_at,
        )
    }
}

#[derive(FromRow)]
struct UrlWithVisitsRow {
    #[sqlx(flatten)]
    url: UrlRow,
    total_visits: i64,
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewUrl) -> Result<Url, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (short_code, long_url, user_id, guest_token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, short_code, long_url, user_id, guest_token, created_at
            "#,
        )
        .bind(&new_url.short_code)
        .bind(&new_url.long_url)
        .bind(new_url.user_id())
        .bind(new_url.guest_token())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_short_code_collision(&e) {
                AppError::conflict(
                    "Short code already exists",
                    json!({ "short_code": new_url.short_code }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Url>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, short_code, long_url, user_id, guest_token, created_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Url::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Url>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, short_code, long_url, user_id, guest_token, created_at
            FROM urls
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Url::from))
    }

    async fn list_with_visits(&self, owner: &Owner) -> Result<Vec<UrlWithVisits>, AppError> {
        let (user_id, guest_token) = match owner {
            Owner::User(id) => (Some(id.as_str()), None),
            Owner::Guest(token) => (None, Some(token.as_str())),
        };

        let rows = sqlx::query_as::<_, UrlWithVisitsRow>(
            r#"
            SELECT
                u.id, u.short_code, u.long_url, u.user_id, u.guest_token, u.created_at,
                COUNT(v.id) AS total_visits
            FROM urls u
            LEFT JOIN visits v ON v.url_id = u.id
            WHERE ($1::text IS NOT NULL AND u.user_id = $1)
               OR ($2::text IS NOT NULL AND u.user_id IS NULL AND u.guest_token = $2)
            GROUP BY u.id
            ORDER BY u.created_at DESC, u.id DESC
            "#,
        )
        .bind(user_id)
        .bind(guest_token)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UrlWithVisits {
                url: r.url.into(),
                total_visits: r.total_visits,
            })
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_created(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM urls
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at < $2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
