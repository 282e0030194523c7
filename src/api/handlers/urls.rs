//! Handlers for listing and deleting the caller's links.

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::api::dto::url_list::{MessageResponse, UrlListItem};
use crate::api::extractors::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first, with visit counts.
///
/// # Endpoint
///
/// `GET /api/url/list`
///
/// Signed-in users see their own links. Guests see the links created under
/// their `guest_id` cookie; a guest without one gets an empty list.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<UrlListItem>>, AppError> {
    let Some(owner) = identity.owner() else {
        return Ok(Json(Vec::new()));
    };

    let items = state
        .link_service
        .list_links(&owner)
        .await?
        .into_iter()
        .map(|item| {
            let short_url = state.link_service.short_url(&item.url.short_code);
            UrlListItem::new(item, short_url)
        })
        .collect();

    Ok(Json(items))
}

/// Deletes one of the caller's links together with its visits.
///
/// # Endpoint
///
/// `DELETE /api/url/{id}`
///
/// # Errors
///
/// - 400 if the id is not an integer
/// - 404 if no link has this id
/// - 403 if the caller does not own it
pub async fn delete_url_handler(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .link_service
        .delete_link(id, identity.owner().as_ref())
        .await?;

    Ok(Json(MessageResponse {
        message: "URL deleted successfully".to_string(),
    }))
}
