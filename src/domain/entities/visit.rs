//! Visit entity representing a single resolved redirect.

use chrono::{DateTime, Utc};

/// Placeholder used when the client address cannot be determined.
pub const UNKNOWN_IP: &str = "unknown";
/// Placeholder used when the request has no `User-Agent` header.
pub const UNKNOWN_USER_AGENT: &str = "unknown";
/// Placeholder used when the request has no `Referer` header.
pub const DIRECT_REFERRER: &str = "direct";

/// A visit recorded when a short link is resolved.
///
/// Never mutated; removed only when the parent [`super::Url`] is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub id: i64,
    pub url_id: i64,
    pub ip: String,
    pub user_agent: String,
    pub referrer: String,
    pub created_at: DateTime<Utc>,
}

impl Visit {
    /// Creates a new Visit instance.
    pub fn new(
        id: i64,
        url_id: i64,
        ip: String,
        user_agent: String,
        referrer: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            url_id,
            ip,
            user_agent,
            referrer,
            created_at,
        }
    }
}

/// Input data for recording a visit.
///
/// Missing client metadata is replaced by the sentinel strings above, so every
/// stored visit has all three fields populated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub url_id: i64,
    pub ip: String,
    pub user_agent: String,
    pub referrer: String,
}

impl NewVisit {
    pub fn new(
        url_id: i64,
        ip: Option<String>,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Self {
        Self {
            url_id,
            ip: ip
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNKNOWN_IP.to_string()),
            user_agent: user_agent
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_USER_AGENT)
                .to_string(),
            referrer: referrer
                .filter(|s| !s.is_empty())
                .unwrap_or(DIRECT_REFERRER)
                .to_string(),
        }
    }
}
