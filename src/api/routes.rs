//! API route configuration.

use crate::api::handlers::{
    analytics_handler, create_session_handler, delete_session_handler, delete_url_handler,
    list_urls_handler, me_handler, shorten_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

/// Link creation.
///
/// - `POST /shorten` - Create a short URL (guest quota applies)
pub fn shorten_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Identity bridge callback, protected by the bridge secret.
///
/// - `POST /auth/session` - Sign a user in
pub fn bridge_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/session", post(create_session_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// Routes usable by guests and users alike.
///
/// - `GET    /analytics/users` - Monthly analytics
/// - `GET    /url/list`        - Caller's links
/// - `DELETE /url/{id}`        - Delete one of the caller's links
/// - `DELETE /auth/session`    - Sign out
/// - `GET    /auth/me`         - Signed-in user profile
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/users", get(analytics_handler))
        .route("/url/list", get(list_urls_handler))
        .route("/url/{id}", delete(delete_url_handler))
        .route("/auth/session", delete(delete_session_handler))
        .route("/auth/me", get(me_handler))
}
