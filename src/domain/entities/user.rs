//! User entity for authenticated link owners.

use chrono::{DateTime, Utc};

/// A signed-in user.
///
/// The identity provider flow lives outside this service; all we keep is the
/// profile it hands us and an opaque id used as the ownership key.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile received from the identity provider on sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}
