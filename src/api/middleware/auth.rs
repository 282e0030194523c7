//! Bearer secret check for the identity bridge.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Lets a request through only if it carries the identity bridge secret.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <IDENTITY_BRIDGE_SECRET>
/// ```
///
/// Only the service completing the external OAuth flow knows this secret, so
/// only it can turn a verified email into a session.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing, malformed or carries
/// the wrong secret.
///
/// # Example
///
/// ```rust,ignore
/// let bridge = Router::new()
///     .route("/auth/session", post(create_session_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    st.auth_service
        .verify_bridge_secret(&token)
        .inspect_err(|_| tracing::warn!("Rejected identity bridge call with a wrong secret"))?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
