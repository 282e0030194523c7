mod common;

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use serde_json::json;
use shortlink::domain::repositories::UrlRepository;

#[tokio::test]
async fn test_shorten_as_guest_returns_short_url_and_cookies() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<serde_json::Value>();
    let short_url = body["shortUrl"].as_str().unwrap();
    assert!(short_url.starts_with("http://sho.rt/"));
    assert_eq!(common::code_of(&body["shortUrl"]).len(), 8);
    assert_eq!(body["remainingLinks"], 2);

    assert_eq!(response.cookie("guest_links").value(), "1");
    assert!(!response.cookie("guest_id").value().is_empty());
}

#[tokio::test]
async fn test_guest_quota_counts_down_and_blocks_fourth_link() {
    let app = common::spawn_app();

    let first = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/1" }))
        .await;
    first.assert_status(StatusCode::CREATED);
    let guest_id = first.cookie("guest_id");

    for (used, remaining) in [(1, 1), (2, 0)] {
        let response = app
            .server
            .post("/api/shorten")
            .add_cookie(Cookie::new("guest_links", used.to_string()))
            .add_cookie(guest_id.clone())
            .json(&json!({ "url": format!("https://example.com/{}", used + 1) }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["remainingLinks"], remaining);
        assert_eq!(
            response.cookie("guest_links").value(),
            (used + 1).to_string()
        );
        // The guest keeps the token it already has.
        assert!(response.maybe_cookie("guest_id").is_none());
    }

    let before = app.store.count_created(None, None).await.unwrap();
    assert_eq!(before, 3);

    let response = app
        .server
        .post("/api/shorten")
        .add_cookie(Cookie::new("guest_links", "3"))
        .add_cookie(guest_id)
        .json(&json!({ "url": "https://example.com/4" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "quota_exceeded");
    assert_eq!(body["requiresSignIn"], true);
    assert!(body["error"].as_str().unwrap().contains("limit"));

    assert_eq!(app.store.count_created(None, None).await.unwrap(), before);
}

#[tokio::test]
async fn test_garbage_counter_counts_as_zero() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .add_cookie(Cookie::new("guest_links", "lots"))
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<serde_json::Value>()["remainingLinks"], 2);
}

#[tokio::test]
async fn test_signed_in_user_is_not_limited() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .add_cookie(app.session_cookie("user-1"))
        .add_cookie(Cookie::new("guest_links", "3"))
        .json(&json!({ "url": "https://example.com/mine" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<serde_json::Value>();
    assert!(body.get("remainingLinks").is_none());
    assert!(response.maybe_cookie("guest_links").is_none());

    let url = app
        .store
        .find_by_code(&common::code_of(&body["shortUrl"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(url.user_id.as_deref(), Some("user-1"));
    assert!(url.guest_token.is_none());
}

#[tokio::test]
async fn test_forged_session_is_treated_as_guest() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .add_cookie(Cookie::new("session", "user-1.deadbeef"))
        .add_cookie(Cookie::new("guest_links", "3"))
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_urls_are_rejected() {
    let app = common::spawn_app();

    for payload in [
        json!({}),
        json!({ "url": "" }),
        json!({ "url": "not a url" }),
        json!({ "url": "ftp://example.com/file" }),
        json!({ "url": "/relative/path" }),
    ] {
        let response = app.server.post("/api/shorten").json(&payload).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["code"],
            "validation_error"
        );
    }

    assert_eq!(app.store.count_created(None, None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_same_url_twice_creates_two_mappings() {
    let app = common::spawn_app();

    let a = app.shorten("https://example.com/dup").await;
    let b = app.shorten("https://example.com/dup").await;

    assert_ne!(a["shortUrl"], b["shortUrl"]);
    assert_eq!(app.store.count_created(None, None).await.unwrap(), 2);
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let app = common::spawn_app();

    let response = app
        .server
        .post("/api/shorten")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["code"], "validation_error");
    assert_eq!(body["error"], "Request body is not valid JSON");

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": 42 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<serde_json::Value>()["code"],
        "validation_error"
    );

    assert_eq!(app.store.count_created(None, None).await.unwrap(), 0);
}
