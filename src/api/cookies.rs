//! Cookies carrying guest quota and session identity.
//!
//! | Name | Value | Lifetime |
//! |---|---|---|
//! | `guest_links` | links created as guest | guest TTL |
//! | `guest_id` | opaque guest token | guest TTL |
//! | `session` | signed user id | 30 days |

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::application::services::auth_service::SESSION_TTL_DAYS;
use crate::domain::guest_quota::DEFAULT_GUEST_LINK_LIMIT;

pub const GUEST_LINKS_COOKIE: &str = "guest_links";
pub const GUEST_ID_COOKIE: &str = "guest_id";
pub const SESSION_COOKIE: &str = "session";

/// Guest quota and cookie attributes.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub guest_link_limit: u32,
    pub guest_ttl_days: i64,
    pub secure: bool,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            guest_link_limit: DEFAULT_GUEST_LINK_LIMIT,
            guest_ttl_days: 7,
            secure: false,
        }
    }
}

impl CookiePolicy {
    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(max_age)
            .build()
    }

    pub fn guest_links(&self, used: u32) -> Cookie<'static> {
        self.build(
            GUEST_LINKS_COOKIE,
            used.to_string(),
            Duration::days(self.guest_ttl_days),
        )
    }

    pub fn guest_id(&self, token: String) -> Cookie<'static> {
        self.build(GUEST_ID_COOKIE, token, Duration::days(self.guest_ttl_days))
    }

    pub fn session(&self, token: String) -> Cookie<'static> {
        self.build(SESSION_COOKIE, token, Duration::days(SESSION_TTL_DAYS))
    }

    /// Cookie that, added to a jar's removal list, clears `name`.
    pub fn removal(name: &'static str) -> Cookie<'static> {
        Cookie::build(name).path("/").build()
    }
}
