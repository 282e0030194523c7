//! Url entity representing a short code to long URL mapping.

use chrono::{DateTime, Utc};

/// Who created a short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// An authenticated user, identified by the opaque id from the identity provider.
    User(String),
    /// A guest, identified by the opaque token stored in the `guest_id` cookie.
    Guest(String),
}

/// A stored short link.
///
/// Created once at shorten-time and immutable afterwards; the only mutation is
/// deletion by its owner, which cascades to its visits.
#[derive(Debug, Clone, PartialEq)]
pub struct Url {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub user_id: Option<String>,
    pub guest_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Url {
    /// Creates a new Url instance.
    pub fn new(
        id: i64,
        short_code: String,
        long_url: String,
        user_id: Option<String>,
        guest_token: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            long_url,
            user_id,
            guest_token,
            created_at,
        }
    }

    /// Returns true if `owner` may manage (delete) this link.
    ///
    /// User-owned links belong to that user only. Guest links belong to the
    /// guest token that created them. A link with neither is unmanageable.
    pub fn is_owned_by(&self, owner: &Owner) -> bool {
        match (owner, &self.user_id, &self.guest_token) {
            (Owner::User(id), Some(user_id), _) => id == user_id,
            (Owner::Guest(token), None, Some(guest_token)) => token == guest_token,
            _ => false,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrl {
    pub short_code: String,
    pub long_url: String,
    pub owner: Owner,
}

impl NewUrl {
    pub fn user_id(&self) -> Option<&str> {
        match &self.owner {
            Owner::User(id) => Some(id),
            Owner::Guest(_) => None,
        }
    }

    pub fn guest_token(&self) -> Option<&str> {
        match &self.owner {
            Owner::Guest(token) => Some(token),
            Owner::User(_) => None,
        }
    }
}

/// A link together with its total visit count, as shown in listings.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlWithVisits {
    pub url: Url,
    pub total_visits: i64,
}
