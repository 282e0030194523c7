//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL; format is checked by the link service.
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}

/// Created short link.
///
/// `remainingLinks` is present only for guests.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub remaining_links: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_fails_validation() {
        let req: ShortenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_response_omits_remaining_for_users() {
        let value = serde_json::to_value(ShortenResponse {
            short_url: "http://localhost:3000/abcd1234".to_string(),
            remaining_links: None,
        })
        .unwrap();

        assert_eq!(value["shortUrl"], "http://localhost:3000/abcd1234");
        assert!(value.get("remainingLinks").is_none());
    }
}
