mod common;

use chrono::{Duration, Local};
use shortlink::application::services::analytics_service::month_windows;
use shortlink::domain::entities::{NewUrl, NewVisit, Owner};

async fn seed_url(app: &common::TestApp, code: &str, at: chrono::DateTime<chrono::Utc>) -> i64 {
    app.store
        .insert_url_at(
            NewUrl {
                short_code: code.to_string(),
                long_url: format!("https://example.com/{}", code),
                owner: Owner::Guest("seed".to_string()),
            },
            at,
        )
        .await
        .unwrap()
        .id
}

async fn seed_visit(
    app: &common::TestApp,
    url_id: i64,
    ip: &str,
    at: chrono::DateTime<chrono::Utc>,
) {
    app.store
        .insert_visit_at(NewVisit::new(url_id, Some(ip.to_string()), None, None), at)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_store_reports_zero_and_growth_100() {
    let app = common::spawn_app();

    let response = app.server.get("/api/analytics/users").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["currentMonthUsers"], 0);
    assert_eq!(body["previousMonthUsers"], 0);
    assert_eq!(body["currentMonthClicks"], 0);
    assert_eq!(body["previousMonthClicks"], 0);
    assert_eq!(body["usersGrowth"], 100.0);
    assert_eq!(body["clicksGrowth"], 100.0);
    assert_eq!(body["linksGrowth"], 100.0);
}

#[tokio::test]
async fn test_current_and_previous_month_windows() {
    let app = common::spawn_app();
    let windows = month_windows(&Local::now());
    let current = windows.current_start;
    let previous = windows.previous_start;

    let old = seed_url(&app, "old00001", previous - Duration::days(3)).await;
    let last = seed_url(&app, "last0001", previous + Duration::hours(1)).await;
    let now = seed_url(&app, "now00001", current).await;
    seed_url(&app, "now00002", current + Duration::seconds(5)).await;

    // Before the previous month: counted nowhere.
    seed_visit(&app, old, "9.9.9.9", previous - Duration::seconds(1)).await;

    // Previous month: 2 visits from 2 visitors.
    seed_visit(&app, last, "1.1.1.1", previous).await;
    seed_visit(&app, last, "2.2.2.2", current - Duration::seconds(1)).await;

    // Current month: 3 visits from 1 visitor, one exactly on the boundary.
    seed_visit(&app, now, "1.1.1.1", current).await;
    seed_visit(&app, now, "1.1.1.1", current + Duration::minutes(1)).await;
    seed_visit(&app, last, "1.1.1.1", current + Duration::minutes(2)).await;

    let body = app
        .server
        .get("/api/analytics/users")
        .await
        .json::<serde_json::Value>();

    assert_eq!(body["currentMonthUsers"], 1);
    assert_eq!(body["previousMonthUsers"], 2);
    assert_eq!(body["currentMonthClicks"], 3);
    assert_eq!(body["previousMonthClicks"], 2);
    assert_eq!(body["currentMonthLinks"], 2);
    assert_eq!(body["previousMonthLinks"], 1);
    assert_eq!(body["usersGrowth"], -50.0);
    assert_eq!(body["clicksGrowth"], 50.0);
    assert_eq!(body["linksGrowth"], 100.0);
}
