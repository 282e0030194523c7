//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::api::cookies::CookiePolicy;
use crate::application::services::{AnalyticsService, AuthService, LinkService};
use crate::domain::repositories::{UrlRepository, UserRepository, VisitRepository};
use crate::domain::visit_tracker::VisitTracker;

/// Repository handles the state is built from.
///
/// The PostgreSQL repositories and the in-memory store both fit here; the
/// in-memory store is passed three times as the same `Arc`.
pub struct Repositories {
    pub urls: Arc<dyn UrlRepository>,
    pub visits: Arc<dyn VisitRepository>,
    pub users: Arc<dyn UserRepository>,
}

/// Secrets and cookie settings taken from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub base_url: String,
    pub session_secret: String,
    pub identity_bridge_secret: String,
    pub cookies: CookiePolicy,
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn UrlRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn UrlRepository, dyn VisitRepository>>,
    pub auth_service: Arc<AuthService<dyn UserRepository>>,
    pub visit_tracker: VisitTracker,
    pub cookies: CookiePolicy,
}

impl AppState {
    pub fn new(repositories: Repositories, settings: StateSettings) -> Self {
        let Repositories {
            urls,
            visits,
            users,
        } = repositories;

        Self {
            link_service: Arc::new(LinkService::new(urls.clone(), settings.base_url)),
            analytics_service: Arc::new(AnalyticsService::new(urls, visits.clone())),
            auth_service: Arc::new(AuthService::new(
                users,
                settings.session_secret,
                settings.identity_bridge_secret,
            )),
            visit_tracker: VisitTracker::new(visits),
            cookies: settings.cookies,
        }
    }
}
