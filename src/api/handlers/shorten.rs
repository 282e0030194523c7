//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::{CookieJar, WithRejection};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extractors::Identity;
use crate::domain::entities::Owner;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::generate_guest_token;

/// Creates a short URL for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "shortUrl": "http://localhost:3000/Ab3_x9Qz", "remainingLinks": 2 }
/// ```
///
/// # Guest Quota
///
/// Without a session, the `guest_links` cookie counts links created so far.
/// Once it reaches the limit the request is refused before anything is
/// stored. On success guests get the incremented counter back, plus a
/// `guest_id` cookie on their first link.
///
/// # Errors
///
/// - 400 if the body is not a JSON object with a string `url`, or the URL is
///   not an absolute HTTP(S) URL
/// - 403 with `requiresSignIn: true` if the guest quota is used up
/// - 500 on store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    identity: Identity,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<ShortenRequest>, AppError>,
) -> Result<(StatusCode, CookieJar, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let (owner, quota, jar) = match identity {
        Identity::User { user_id } => (Owner::User(user_id), None, jar),
        Identity::Guest { guest_id, quota } => {
            if quota.is_exhausted() {
                metrics::counter!("guest_quota_rejected_total").increment(1);
                return Err(AppError::quota_exceeded(
                    "Guest link limit reached. Sign in to create more links.",
                    json!({ "limit": quota.limit() }),
                ));
            }

            let (token, jar) = match guest_id {
                Some(token) => (token, jar),
                None => {
                    let token = generate_guest_token()?;
                    let jar = jar.add(state.cookies.guest_id(token.clone()));
                    (token, jar)
                }
            };

            (Owner::Guest(token), Some(quota), jar)
        }
    };

    let url = state.link_service.shorten(payload.url, owner).await?;
    let short_url = state.link_service.short_url(&url.short_code);

    let (jar, remaining_links) = match quota.and_then(|q| q.consume()) {
        Some(next) => (
            jar.add(state.cookies.guest_links(next.used())),
            Some(next.remaining()),
        ),
        None => (jar, None),
    };

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ShortenResponse {
            short_url,
            remaining_links,
        }),
    ))
}
