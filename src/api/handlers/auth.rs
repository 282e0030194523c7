//! Handlers for sessions established through the identity bridge.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::{CookieJar, WithRejection};
use serde_json::json;
use validator::Validate;

use crate::api::cookies::{CookiePolicy, SESSION_COOKIE};
use crate::api::dto::auth::{SessionRequest, SessionResponse, UserResponse};
use crate::api::extractors::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Signs a user in after the external OAuth flow succeeded.
///
/// # Endpoint
///
/// `POST /api/auth/session` (bridge secret required, see
/// [`crate::api::middleware::auth`])
///
/// # Request Body
///
/// ```json
/// { "email": "ada@example.com", "name": "Ada", "image": null }
/// ```
///
/// The first sign-in creates the user. The response sets the `session`
/// cookie and also returns the token for clients that relay it themselves.
pub async fn create_session_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<SessionRequest>, AppError>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    payload.validate()?;

    let (user, token) = state.auth_service.sign_in(payload.into()).await?;

    Ok((
        jar.add(state.cookies.session(token.clone())),
        Json(SessionResponse {
            user_id: user.id,
            session_token: token,
        }),
    ))
}

/// Signs the caller out by clearing the `session` cookie.
///
/// `DELETE /api/auth/session`
pub async fn delete_session_handler(jar: CookieJar) -> (StatusCode, CookieJar) {
    (
        StatusCode::NO_CONTENT,
        jar.remove(CookiePolicy::removal(SESSION_COOKIE)),
    )
}

/// Returns the signed-in user's profile.
///
/// `GET /api/auth/me`
///
/// # Errors
///
/// Returns 401 for guests.
pub async fn me_handler(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<UserResponse>, AppError> {
    let Identity::User { user_id } = identity else {
        return Err(AppError::unauthorized(
            "Not signed in",
            json!({ "reason": "No valid session" }),
        ));
    };

    let user = state.auth_service.current_user(&user_id).await?;

    Ok(Json(user.into()))
}
