//! Process-local store implementing every repository trait.
//!
//! Selected with `STORAGE_BACKEND=memory`. Data lives as long as the process
//! and is shared through one [`InMemoryStore`] handle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{NewUrl, NewUser, NewVisit, Owner, Url, UrlWithVisits, User, Visit};
use crate::domain::repositories::{
    UrlRepository, UserRepository, VisitRepository, VisitWindowStats,
};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    urls: Vec<Url>,
    visits: Vec<Visit>,
    users: HashMap<String, User>,
    next_url_id: i64,
    next_visit_id: i64,
}

/// In-memory store with the same observable behavior as the PostgreSQL
/// repositories: unique short codes, cascade delete of visits and
/// referential checks on visit insert.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link with an explicit creation time.
    ///
    /// Used to seed data spanning several months.
    pub async fn insert_url_at(
        &self,
        new_url: NewUrl,
        created_at: DateTime<Utc>,
    ) -> Result<Url, AppError> {
        let mut tables = self.tables.write().await;

        if tables.urls.iter().any(|u| u.short_code == new_url.short_code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "short_code": new_url.short_code }),
            ));
        }

        tables.next_url_id += 1;
        let url = Url::new(
            tables.next_url_id,
            new_url.short_code.clone(),
            new_url.long_url.clone(),
            new_url.user_id().map(str::to_string),
            new_url.guest_token().map(str::to_string),
            created_at,
        );
        tables.urls.push(url.clone());

        Ok(url)
    }

    /// Records a visit with an explicit timestamp.
    pub async fn insert_visit_at(
        &self,
        new_visit: NewVisit,
        created_at: DateTime<Utc>,
    ) -> Result<Visit, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.urls.iter().any(|u| u.id == new_visit.url_id) {
            return Err(AppError::bad_request(
                "Short link no longer exists",
                json!({ "url_id": new_visit.url_id }),
            ));
        }

        tables.next_visit_id += 1;
        let visit = Visit::new(
            tables.next_visit_id,
            new_visit.url_id,
            new_visit.ip,
            new_visit.user_agent,
            new_visit.referrer,
            created_at,
        );
        tables.visits.push(visit.clone());

        Ok(visit)
    }
}

fn in_window(ts: DateTime<Utc>, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
    from.is_none_or(|f| ts >= f) && to.is_none_or(|t| ts < t)
}

#[async_trait]
impl UrlRepository for InMemoryStore {
    async fn create(&self, new_url: NewUrl) -> Result<Url, AppError> {
        self.insert_url_at(new_url, Utc::now()).await
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Url>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .urls
            .iter()
            .find(|u| u.short_code == short_code)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Url>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.urls.iter().find(|u| u.id == id).cloned())
    }

    async fn list_with_visits(&self, owner: &Owner) -> Result<Vec<UrlWithVisits>, AppError> {
        let tables = self.tables.read().await;

        let mut items: Vec<UrlWithVisits> = tables
            .urls
            .iter()
            .filter(|u| u.is_owned_by(owner))
            .map(|u| UrlWithVisits {
                url: u.clone(),
                total_visits: tables.visits.iter().filter(|v| v.url_id == u.id).count() as i64,
            })
            .collect();

        items.sort_by(|a, b| {
            b.url
                .created_at
                .cmp(&a.url.created_at)
                .then(b.url.id.cmp(&a.url.id))
        });

        Ok(items)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;

        let before = tables.urls.len();
        tables.urls.retain(|u| u.id != id);
        if tables.urls.len() == before {
            return Ok(false);
        }

        tables.visits.retain(|v| v.url_id != id);
        Ok(true)
    }

    async fn count_created(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .urls
            .iter()
            .filter(|u| in_window(u.created_at, from, to))
            .count() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl VisitRepository for InMemoryStore {
    async fn record(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        self.insert_visit_at(new_visit, Utc::now()).await
    }

    async fn window_stats(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<VisitWindowStats, AppError> {
        let tables = self.tables.read().await;

        let mut ips: HashSet<&str> = HashSet::new();
        let mut visits = 0;
        for visit in tables
            .visits
            .iter()
            .filter(|v| in_window(v.created_at, from, to))
        {
            visits += 1;
            ips.insert(&visit.ip);
        }

        Ok(VisitWindowStats {
            distinct_visitors: ips.len() as i64,
            visits,
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_or_create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.users.values().find(|u| u.email == new_user.email) {
            return Ok(existing.clone());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new_user.email,
            name: new_user.name,
            image: new_user.image,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }
}
