//! Visitor metadata extraction from HTTP request headers.

use axum::http::{HeaderMap, header};

use crate::domain::entities::NewVisit;

const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Best-effort client address.
///
/// Priority:
/// 1. First entry of `X-Forwarded-For`
/// 2. `CF-Connecting-IP`
///
/// Returns `None` when neither header yields a non-empty value. Header values
/// are taken as-is; they are client-controlled and only used for analytics.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let connecting = || {
        headers
            .get(CF_CONNECTING_IP)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded.or_else(connecting).map(str::to_string)
}

/// Builds the visit record for a resolved link from the request headers.
pub fn visit_from_headers(url_id: i64, headers: &HeaderMap) -> NewVisit {
    NewVisit::new(
        url_id,
        extract_client_ip(headers),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(extract_client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_falls_back_to_cf_connecting_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(extract_client_ip(&headers).as_deref(), Some("198.51.100.2"));
    }

    #[test]
    fn test_empty_forwarded_for_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" , 10.0.0.1"));
        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(extract_client_ip(&headers).as_deref(), Some("198.51.100.2"));
    }

    #[test]
    fn test_no_headers_is_none() {
        assert!(extract_client_ip(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_visit_from_headers_uses_sentinels() {
        let visit = visit_from_headers(5, &HeaderMap::new());

        assert_eq!(visit.url_id, 5);
        assert_eq!(visit.ip, "unknown");
        assert_eq!(visit.user_agent, "unknown");
        assert_eq!(visit.referrer, "direct");
    }

    #[test]
    fn test_visit_from_headers_copies_metadata() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("TestBot/1.0"));
        headers.insert(header::REFERER, HeaderValue::from_static("https://google.com"));

        let visit = visit_from_headers(5, &headers);

        assert_eq!(visit.ip, "203.0.113.7");
        assert_eq!(visit.user_agent, "TestBot/1.0");
        assert_eq!(visit.referrer, "https://google.com");
    }
}
