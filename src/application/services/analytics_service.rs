//! Monthly visit and link analytics.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde_json::json;

use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::error::AppError;

/// Start instants of the previous and current calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindows {
    pub previous_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
}

/// Current vs previous month counts with growth percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySummary {
    pub current_month_users: i64,
    pub previous_month_users: i64,
    pub current_month_clicks: i64,
    pub previous_month_clicks: i64,
    pub current_month_links: i64,
    pub previous_month_links: i64,
    pub users_growth: f64,
    pub clicks_growth: f64,
    pub links_growth: f64,
}

/// Computes the month boundaries for `now` in `now`'s own time zone.
///
/// Each boundary is the first day of the month at local midnight. When local
/// midnight does not exist (a DST gap), the earliest valid instant is used,
/// falling back to midnight read as UTC.
pub fn month_windows<Tz: TimeZone>(now: &DateTime<Tz>) -> MonthWindows {
    let tz = now.timezone();
    let local = now.date_naive();

    let (prev_year, prev_month) = if local.month() == 1 {
        (local.year() - 1, 12)
    } else {
        (local.year(), local.month() - 1)
    };

    let start_of = |year: i32, month: u32| -> DateTime<Utc> {
        let midnight = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();

        tz.from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc())
    };

    MonthWindows {
        previous_start: start_of(prev_year, prev_month),
        current_start: start_of(local.year(), local.month()),
    }
}

/// Percentage change from `previous` to `current`.
///
/// Defined as exactly `100.0` when `previous` is zero, so the result is
/// always finite.
pub fn growth_percentage(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return 100.0;
    }

    (current - previous) as f64 / previous as f64 * 100.0
}

/// Service aggregating visits and links per calendar month.
pub struct AnalyticsService<U: UrlRepository + ?Sized, V: VisitRepository + ?Sized> {
    urls: Arc<U>,
    visits: Arc<V>,
}

impl<U: UrlRepository + ?Sized, V: VisitRepository + ?Sized> AnalyticsService<U, V> {
    /// Creates a new analytics service.
    pub fn new(urls: Arc<U>, visits: Arc<V>) -> Self {
        Self { urls, visits }
    }

    /// Compares the current calendar month with the previous one.
    ///
    /// The current window is open-ended (`ts >= current_start`); the previous
    /// window is `previous_start <= ts < current_start`.
    ///
    /// # Performance
    ///
    /// The four window queries run concurrently with `tokio::try_join!`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn monthly_summary<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<MonthlySummary, AppError> {
        let windows = month_windows(now);

        let (current_visits, previous_visits, current_links, previous_links) = tokio::try_join!(
            self.visits.window_stats(Some(windows.current_start), None),
            self.visits
                .window_stats(Some(windows.previous_start), Some(windows.current_start)),
            self.urls.count_created(Some(windows.current_start), None),
            self.urls
                .count_created(Some(windows.previous_start), Some(windows.current_start)),
        )
        .map_err(|e| match e {
            AppError::Internal { .. } => {
                AppError::internal("Failed to fetch user analytics", json!({}))
            }
            other => other,
        })?;

        Ok(MonthlySummary {
            current_month_users: current_visits.distinct_visitors,
            previous_month_users: previous_visits.distinct_visitors,
            current_month_clicks: current_visits.visits,
            previous_month_clicks: previous_visits.visits,
            current_month_links: current_links,
            previous_month_links: previous_links,
            users_growth: growth_percentage(
                current_visits.distinct_visitors,
                previous_visits.distinct_visitors,
            ),
            clicks_growth: growth_percentage(current_visits.visits, previous_visits.visits),
            links_growth: growth_percentage(current_links, previous_links),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockUrlRepository, MockVisitRepository, VisitWindowStats};
    use chrono::FixedOffset;

    #[test]
    fn test_growth_is_100_when_previous_is_zero() {
        let growth = growth_percentage(7, 0);

        assert_eq!(growth, 100.0);
        assert!(growth.is_finite());
    }

    #[test]
    fn test_growth_regular_cases() {
        assert_eq!(growth_percentage(150, 100), 50.0);
        assert_eq!(growth_percentage(50, 100), -50.0);
        assert_eq!(growth_percentage(10, 10), 0.0);
        assert_eq!(growth_percentage(0, 4), -100.0);
    }

    #[test]
    fn test_month_windows_mid_year() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 13, 45, 0).unwrap();
        let windows = month_windows(&now);

        assert_eq!(
            windows.current_start,
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            windows.previous_start,
            Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_windows_january_wraps_year() {
        let now = Utc.with_ymd_and_hms(2026, 1, 3, 8, 0, 0).unwrap();
        let windows = month_windows(&now);

        assert_eq!(
            windows.previous_start,
            Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            windows.current_start,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_windows_use_local_midnight() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        // 2026-11-01 01:00 local is still 2026-10-31 in UTC.
        let now = tz.with_ymd_and_hms(2026, 11, 1, 1, 0, 0).unwrap();
        let windows = month_windows(&now);

        assert_eq!(
            windows.current_start,
            Utc.with_ymd_and_hms(2026, 10, 31, 21, 0, 0).unwrap()
        );
        assert_eq!(
            windows.previous_start,
            Utc.with_ymd_and_hms(2026, 9, 30, 21, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_monthly_summary_partitions_windows() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let current_start = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let previous_start = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();

        let mut visits = MockVisitRepository::new();
        visits
            .expect_window_stats()
            .withf(move |from, to| *from == Some(current_start) && to.is_none())
            .times(1)
            .returning(|_, _| {
                Ok(VisitWindowStats {
                    distinct_visitors: 6,
                    visits: 20,
                })
            });
        visits
            .expect_window_stats()
            .withf(move |from, to| *from == Some(previous_start) && *to == Some(current_start))
            .times(1)
            .returning(|_, _| {
                Ok(VisitWindowStats {
                    distinct_visitors: 0,
                    visits: 10,
                })
            });

        let mut urls = MockUrlRepository::new();
        urls.expect_count_created()
            .withf(move |from, to| *from == Some(current_start) && to.is_none())
            .times(1)
            .returning(|_, _| Ok(4));
        urls.expect_count_created()
            .withf(move |from, to| *from == Some(previous_start) && *to == Some(current_start))
            .times(1)
            .returning(|_, _| Ok(2));

        let service = AnalyticsService::new(Arc::new(urls), Arc::new(visits));
        let summary = service.monthly_summary(&now).await.unwrap();

        assert_eq!(summary.current_month_users, 6);
        assert_eq!(summary.previous_month_users, 0);
        assert_eq!(summary.current_month_clicks, 20);
        assert_eq!(summary.previous_month_clicks, 10);
        assert_eq!(summary.users_growth, 100.0);
        assert_eq!(summary.clicks_growth, 100.0);
        assert_eq!(summary.links_growth, 100.0);
        assert_eq!(summary.current_month_links, 4);
    }

    #[tokio::test]
    async fn test_monthly_summary_store_error() {
        let mut visits = MockVisitRepository::new();
        visits
            .expect_window_stats()
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let mut urls = MockUrlRepository::new();
        urls.expect_count_created().returning(|_, _| Ok(0));

        let service = AnalyticsService::new(Arc::new(urls), Arc::new(visits));
        let result = service.monthly_summary(&Utc::now()).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }
}
