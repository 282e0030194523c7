//! Short code and opaque token generation.
//!
//! Codes are drawn from `getrandom` and encoded as URL-safe base64 without
//! padding, so every character is one of `[A-Za-z0-9_-]` and safe as a path
//! segment. Uniqueness is not guaranteed here; the store's unique constraint
//! is the source of truth and callers retry on collision.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 8;

/// Random bytes per short code (6 bytes encode to exactly 8 characters).
const CODE_LENGTH_BYTES: usize = 6;

/// Random bytes per guest token.
const GUEST_TOKEN_BYTES: usize = 18;

/// Paths that browsers and crawlers request on their own. They are answered
/// with 404 without a store lookup.
const RESERVED_PATHS: &[&str] = &[
    "favicon.ico",
    "robots.txt",
    "apple-touch-icon.png",
    "apple-touch-icon-precomposed.png",
    "sitemap.xml",
];

/// Characters accepted in an inbound short code.
static CODE_FORMAT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid short code regex"));

fn random_token(bytes: usize) -> Result<String, AppError> {
    let mut buffer = vec![0u8; bytes];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Generates a random 8-character short code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 8);
/// ```
pub fn generate_code() -> Result<String, AppError> {
    random_token(CODE_LENGTH_BYTES)
}

/// Generates an opaque token identifying a guest browser.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
pub fn generate_guest_token() -> Result<String, AppError> {
    random_token(GUEST_TOKEN_BYTES)
}

/// Returns true for paths that are never short codes.
pub fn is_reserved_path(path: &str) -> bool {
    RESERVED_PATHS.contains(&path)
}

/// Returns true if `code` is made of short code characters only.
pub fn is_valid_code_format(code: &str) -> bool {
    CODE_FORMAT_REGEX.is_match(code)
}
