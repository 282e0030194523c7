//! Request extractors resolving who is calling.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::api::cookies::{GUEST_ID_COOKIE, GUEST_LINKS_COOKIE, SESSION_COOKIE};
use crate::domain::entities::Owner;
use crate::domain::guest_quota::GuestQuota;
use crate::state::AppState;

/// Caller identity.
///
/// A correctly signed `session` cookie makes the caller a user. Everything
/// else, including a tampered session cookie, is a guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    User {
        user_id: String,
    },
    Guest {
        /// `None` until the guest creates a first link.
        guest_id: Option<String>,
        quota: GuestQuota,
    },
}

impl Identity {
    /// Owner key for listing and deletion, if the caller has one.
    pub fn owner(&self) -> Option<Owner> {
        match self {
            Identity::User { user_id } => Some(Owner::User(user_id.clone())),
            Identity::Guest {
                guest_id: Some(token),
                ..
            } => Some(Owner::Guest(token.clone())),
            Identity::Guest { guest_id: None, .. } => None,
        }
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(user_id) = jar
            .get(SESSION_COOKIE)
            .and_then(|c| state.auth_service.verify_session_token(c.value()))
        {
            return Ok(Identity::User { user_id });
        }

        let guest_id = jar
            .get(GUEST_ID_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|v| !v.is_empty());

        let quota = GuestQuota::from_counter(
            jar.get(GUEST_LINKS_COOKIE).map(|c| c.value()),
            state.cookies.guest_link_limit,
        );

        Ok(Identity::Guest { guest_id, quota })
    }
}
