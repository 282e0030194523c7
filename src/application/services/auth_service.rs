//! Session signing and sign-in for users coming from the identity bridge.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a session token and of the cookie carrying it.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Service for signing users in and verifying their session cookies.
///
/// Session tokens have the form `<user_id>.<expires_at>.<hex signature>`,
/// where `expires_at` is a Unix timestamp and the signature is
/// HMAC-SHA256 over `<user_id>.<expires_at>` keyed by `session_secret`.
/// Without the server-side secret a client can neither mint a token for
/// another user id nor extend an expired one.
pub struct AuthService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    session_secret: String,
    bridge_secret: String,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - user repository
    /// - `session_secret` - HMAC key for session tokens
    /// - `bridge_secret` - bearer secret shared with the identity bridge
    pub fn new(repository: Arc<R>, session_secret: String, bridge_secret: String) -> Self {
        Self {
            repository,
            session_secret,
            bridge_secret,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.session_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    /// Signs `user_id` into a session token valid for [`SESSION_TTL_DAYS`].
    pub fn issue_session_token(&self, user_id: &str) -> String {
        self.issue_session_token_at(user_id, Utc::now())
    }

    /// Signs `user_id` into a session token issued at `now`.
    pub fn issue_session_token_at(&self, user_id: &str, now: DateTime<Utc>) -> String {
        let payload = format!(
            "{}.{}",
            user_id,
            (now + Duration::days(SESSION_TTL_DAYS)).timestamp()
        );

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        format!("{}.{}", payload, hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns the user id carried by a correctly signed, unexpired token.
    pub fn verify_session_token(&self, token: &str) -> Option<String> {
        self.verify_session_token_at(token, Utc::now())
    }

    /// Verifies `token` as of `now`.
    ///
    /// Signature comparison is constant-time and happens before the expiry
    /// is looked at.
    pub fn verify_session_token_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let (payload, signature) = token.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let (user_id, expires_at) = payload.rsplit_once('.')?;
        let expires_at: i64 = expires_at.parse().ok()?;
        if user_id.is_empty() || now.timestamp() >= expires_at {
            return None;
        }

        Some(user_id.to_string())
    }

    /// Checks a bearer token presented by the identity bridge.
    ///
    /// Both values are MACed first so the comparison runs in constant time
    /// regardless of their lengths.
    pub fn verify_bridge_secret(&self, presented: &str) -> Result<(), AppError> {
        let mut expected = self.mac();
        expected.update(self.bridge_secret.as_bytes());
        let expected = expected.finalize().into_bytes();

        let mut mac = self.mac();
        mac.update(presented.as_bytes());

        mac.verify_slice(&expected).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({"reason": "Invalid bridge secret"}))
        })
    }

    /// Upserts the user by email and returns it with a fresh session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty email and
    /// [`AppError::Internal`] on database errors.
    pub async fn sign_in(&self, new_user: NewUser) -> Result<(User, String), AppError> {
        let email = new_user.email.trim();
        if email.is_empty() {
            return Err(AppError::bad_request(
                "Email is required",
                json!({"field": "email"}),
            ));
        }

        let new_user = NewUser {
            email: email.to_string(),
            ..new_user
        };

        let user = self.repository.find_or_create(new_user).await?;
        let token = self.issue_session_token(&user.id);

        tracing::info!(user_id = %user.id, "User signed in");

        Ok((user, token))
    }

    /// Loads the profile behind a verified user id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the user no longer exists.
    pub async fn current_user(&self, user_id: &str) -> Result<User, AppError> {
        self.repository.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::unauthorized("Not signed in", json!({"reason": "Unknown user"}))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;

    fn service(repo: MockUserRepository) -> AuthService<MockUserRepository> {
        AuthService::new(
            Arc::new(repo),
            "test-session-secret".to_string(),
            "bridge-secret".to_string(),
        )
    }

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            name: None,
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_token_roundtrip() {
        let service = service(MockUserRepository::new());

        let token = service.issue_session_token("user-1");

        assert!(token.starts_with("user-1."));
        assert_eq!(
            service.verify_session_token(&token),
            Some("user-1".to_string())
        );
    }

    #[test]
    fn test_tampered_session_token_rejected() {
        let service = service(MockUserRepository::new());
        let token = service.issue_session_token("user-1");
        let (payload, signature) = token.rsplit_once('.').unwrap();
        let (_, expires_at) = payload.rsplit_once('.').unwrap();

        let forged_user = format!("user-2.{}.{}", expires_at, signature);
        let extended = format!("user-1.{}.{}", i64::MAX, signature);

        assert_eq!(service.verify_session_token(&forged_user), None);
        assert_eq!(service.verify_session_token(&extended), None);
        assert_eq!(service.verify_session_token("user-1"), None);
        assert_eq!(service.verify_session_token("user-1.zz"), None);
        assert_eq!(service.verify_session_token(".abcd"), None);
    }

    #[test]
    fn test_session_token_expires() {
        let service = service(MockUserRepository::new());
        let issued = Utc::now() - Duration::days(SESSION_TTL_DAYS + 1);

        let token = service.issue_session_token_at("user-1", issued);

        assert_eq!(service.verify_session_token(&token), None);
        assert_eq!(
            service.verify_session_token_at(&token, issued + Duration::days(1)),
            Some("user-1".to_string())
        );
        assert_eq!(
            service.verify_session_token_at(
                &token,
                issued + Duration::days(SESSION_TTL_DAYS)
            ),
            None
        );
    }

    #[test]
    fn test_tokens_issued_at_different_times_differ() {
        let service = service(MockUserRepository::new());
        let now = Utc::now();

        let a = service.issue_session_token_at("user-1", now);
        let b = service.issue_session_token_at("user-1", now + Duration::seconds(5));

        assert_ne!(a, b);
    }

    #[test]
    fn test_session_secret_matters() {
        let a = service(MockUserRepository::new());
        let b = AuthService::new(
            Arc::new(MockUserRepository::new()),
            "other-secret".to_string(),
            "bridge-secret".to_string(),
        );

        let token = a.issue_session_token("user-1");

        assert_eq!(b.verify_session_token(&token), None);
    }

    #[test]
    fn test_verify_bridge_secret() {
        let service = service(MockUserRepository::new());

        assert!(service.verify_bridge_secret("bridge-secret").is_ok());
        assert!(matches!(
            service.verify_bridge_secret("wrong").unwrap_err(),
            AppError::Unauthorized { .. }
        ));
        assert!(service.verify_bridge_secret("").is_err());
    }

    #[tokio::test]
    async fn test_sign_in_trims_email_and_issues_token() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_or_create()
            .withf(|u| u.email == "ada@example.com")
            .times(1)
            .returning(|u| Ok(user("user-42", &u.email)));

        let service = service(mock_repo);

        let (user, token) = service
            .sign_in(NewUser {
                email: "  ada@example.com ".to_string(),
                name: Some("Ada".to_string()),
                image: None,
            })
            .await
            .unwrap();

        assert_eq!(user.id, "user-42");
        assert_eq!(
            service.verify_session_token(&token),
            Some("user-42".to_string())
        );
    }

    #[tokio::test]
    async fn test_sign_in_requires_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_or_create().never();

        let service = service(mock_repo);

        let result = service
            .sign_in(NewUser {
                email: "   ".to_string(),
                name: None,
                image: None,
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_current_user_unknown() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(mock_repo);

        let result = service.current_user("gone").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }
}
