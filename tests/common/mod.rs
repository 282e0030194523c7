#![allow(dead_code)]

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use serde_json::json;
use shortlink::api::cookies::CookiePolicy;
use shortlink::domain::entities::Owner;
use shortlink::domain::repositories::UrlRepository;
use shortlink::infrastructure::persistence::InMemoryStore;
use shortlink::routes::base_router;
use shortlink::state::{AppState, Repositories, StateSettings};
use std::sync::Arc;

pub const BASE_URL: &str = "http://sho.rt";
pub const BRIDGE_SECRET: &str = "test-bridge-secret";

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

pub fn create_test_state(store: Arc<InMemoryStore>) -> AppState {
    AppState::new(
        Repositories {
            urls: store.clone(),
            visits: store.clone(),
            users: store,
        },
        StateSettings {
            base_url: BASE_URL.to_string(),
            session_secret: "test-session-secret".to_string(),
            identity_bridge_secret: BRIDGE_SECRET.to_string(),
            cookies: CookiePolicy::default(),
        },
    )
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let state = create_test_state(store.clone());
    let server = TestServer::new(base_router(state.clone())).unwrap();

    TestApp {
        server,
        store,
        state,
    }
}

impl TestApp {
    /// Session cookie for `user_id`, signed like the server does.
    pub fn session_cookie(&self, user_id: &str) -> Cookie<'static> {
        Cookie::new(
            "session",
            self.state.auth_service.issue_session_token(user_id),
        )
    }

    /// Shortens `url` as a brand-new guest and returns the response body.
    pub async fn shorten(&self, url: &str) -> serde_json::Value {
        let response = self
            .server
            .post("/api/shorten")
            .json(&json!({ "url": url }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Waits until the detached visit writes for `url_id` reach `expected`.
    pub async fn wait_for_visits(&self, url_id: i64, expected: i64) -> i64 {
        let url = self.store.find_by_id(url_id).await.unwrap().unwrap();
        let owner = match (url.user_id, url.guest_token) {
            (Some(user_id), _) => Owner::User(user_id),
            (None, Some(token)) => Owner::Guest(token),
            (None, None) => panic!("link {} has no owner", url_id),
        };

        let mut count = 0;
        for _ in 0..1000 {
            count = self
                .store
                .list_with_visits(&owner)
                .await
                .unwrap()
                .into_iter()
                .find(|item| item.url.id == url_id)
                .map_or(0, |item| item.total_visits);
            if count >= expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        count
    }
}

/// Extracts the code from a `shortUrl` value.
pub fn code_of(short_url: &serde_json::Value) -> String {
    short_url
        .as_str()
        .unwrap()
        .rsplit('/')
        .next()
        .unwrap()
        .to_string()
}
