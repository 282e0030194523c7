//! DTOs for listing and deleting links.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlWithVisits;

/// One row of the caller's link list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlListItem {
    pub id: i64,
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub total_visits: i64,
}

impl UrlListItem {
    pub fn new(item: UrlWithVisits, short_url: String) -> Self {
        Self {
            id: item.url.id,
            short_code: item.url.short_code,
            short_url,
            long_url: item.url.long_url,
            created_at: item.url.created_at,
            total_visits: item.total_visits,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
