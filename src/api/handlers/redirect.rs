//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::visit_from_headers;
use crate::utils::code_generator::{is_reserved_path, is_valid_code_format};

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reserved browser paths (`favicon.ico`, `robots.txt`, ...) get 404
/// 2. Codes outside `[A-Za-z0-9_-]{1,64}` get 400
/// 3. Look up the code (case-sensitive)
/// 4. Start a detached visit write
/// 5. Return `301 Moved Permanently` with `Location` set to the stored URL
///
/// # Visit Tracking
///
/// The visit is written by a spawned task that the handler never awaits. Its
/// failure is logged by the tracker and cannot change this response.
///
/// # Errors
///
/// Returns 404 if the code does not exist and 500 on store failure.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if is_reserved_path(&code) {
        return Err(AppError::not_found("Not found", json!({ "path": code })));
    }

    if !is_valid_code_format(&code) {
        return Err(AppError::bad_request(
            "Invalid short code",
            json!({ "code": code }),
        ));
    }

    let url = state.link_service.resolve(&code).await?;

    let location = redirect_location(&url.long_url)
        .ok_or_else(|| AppError::internal("Invalid redirect target", json!({ "code": code })))?;

    state
        .visit_tracker
        .track(visit_from_headers(url.id, &headers));

    metrics::counter!("redirects_total").increment(1);
    debug!(short_code = %code, url_id = url.id, "Redirecting");

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
    ))
}

/// `Location` value for a stored URL.
///
/// ASCII URLs are sent verbatim. URLs with non-ASCII characters are sent in
/// their percent-encoded form.
fn redirect_location(long_url: &str) -> Option<HeaderValue> {
    if long_url.is_ascii() {
        return HeaderValue::from_str(long_url).ok();
    }

    let parsed = url::Url::parse(long_url).ok()?;
    HeaderValue::from_str(parsed.as_str()).ok()
}
