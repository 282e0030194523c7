//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`  - Short link redirect
//! - `GET  /health`  - Health check
//! - `/api/*`        - JSON API (see [`crate::api::routes`])
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on link creation and sign-in
//! - **Bridge authentication** - Bearer secret on `POST /api/auth/session`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes without rate limiting.
///
/// Used directly by integration tests, which run without a peer socket
/// address.
pub fn base_router(state: AppState) -> Router {
    router_with(state, None)
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router_with(state, Some(behind_proxy)))
}

fn router_with(state: AppState, rate_limit: Option<bool>) -> Router {
    let mut shorten = api::routes::shorten_routes();
    let mut bridge = api::routes::bridge_routes(state.clone());

    if let Some(behind_proxy) = rate_limit {
        shorten = shorten.layer(rate_limit::layer(behind_proxy));
        bridge = bridge.layer(rate_limit::layer(behind_proxy));
    }

    let api_router = Router::new()
        .merge(shorten)
        .merge(bridge)
        .merge(api::routes::public_routes());

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
