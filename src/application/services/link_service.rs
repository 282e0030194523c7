//! Short link creation, resolution, listing and deletion.

use std::sync::Arc;

use crate::domain::entities::{NewUrl, Owner, Url, UrlWithVisits};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_long_url;
use serde_json::json;
use tracing::{info, warn};

/// Number of fresh codes tried before giving up on a collision streak.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Service for creating and resolving short links.
///
/// Every shorten request creates a new mapping, even when the same long URL
/// was shortened before.
pub struct LinkService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    base_url: String,
}

impl<R: UrlRepository + ?Sized> LinkService<R> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built on, e.g.
    /// `https://s.example.com`.
    pub fn new(repository: Arc<R>, base_url: String) -> Self {
        Self {
            repository,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Validates `long_url` and stores a new mapping for it.
    ///
    /// # Code Generation
    ///
    /// A random 8-character code is generated and inserted. If the insert hits
    /// the unique constraint on the code, a new code is generated, up to
    /// five attempts in total.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute HTTP(S) URL.
    /// Returns [`AppError::Internal`] on store errors or a persistent collision streak.
    pub async fn shorten(&self, long_url: String, owner: Owner) -> Result<Url, AppError> {
        validate_long_url(&long_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "url": long_url.clone() }))
        })?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_url = NewUrl {
                short_code: generate_code()?,
                long_url: long_url.clone(),
                owner: owner.clone(),
            };

            match self.repository.create(new_url).await {
                Ok(url) => {
                    metrics::counter!("links_created_total").increment(1);
                    info!(url_id = url.id, short_code = %url.short_code, "Short link created");
                    return Ok(url);
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "Short code collision, retrying with a new code");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Resolves a short code to its link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve(&self, short_code: &str) -> Result<Url, AppError> {
        self.repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short URL not found", json!({ "code": short_code }))
            })
    }

    /// Lists `owner`'s links with their visit counts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list_links(&self, owner: &Owner) -> Result<Vec<UrlWithVisits>, AppError> {
        self.repository.list_with_visits(owner).await
    }

    /// Deletes a link on behalf of `requester`.
    ///
    /// `requester` is `None` for a guest without a guest token, who owns nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Forbidden`] if the requester does not own it.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn delete_link(&self, id: i64, requester: Option<&Owner>) -> Result<(), AppError> {
        let url = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))?;

        if !requester.is_some_and(|owner| url.is_owned_by(owner)) {
            return Err(AppError::forbidden(
                "You do not own this URL",
                json!({ "id": id }),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("URL not found", json!({ "id": id })));
        }

        info!(url_id = id, short_code = %url.short_code, "Short link deleted");
        Ok(())
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    /// Checks that the link store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
