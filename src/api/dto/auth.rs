//! DTOs for the identity bridge and session endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewUser, User};

/// Profile posted by the identity bridge after a successful sign-in.
#[derive(Debug, Deserialize, Validate)]
pub struct SessionRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<SessionRequest> for NewUser {
    fn from(r: SessionRequest) -> Self {
        NewUser {
            email: r.email,
            name: r.name,
            image: r.image,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub session_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            image: u.image,
            created_at: u.created_at,
        }
    }
}
