//! Handler for monthly analytics.

use axum::{Json, extract::State};
use chrono::Local;

use crate::api::dto::analytics::AnalyticsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns visitor, visit and link counts for this and last calendar month.
///
/// # Endpoint
///
/// `GET /api/analytics/users`
///
/// Month boundaries are local midnight on the first of the month in the
/// server's time zone.
///
/// # Response
///
/// ```json
/// {
///   "currentMonthUsers": 12,
///   "previousMonthUsers": 8,
///   "currentMonthClicks": 40,
///   "previousMonthClicks": 32,
///   "currentMonthLinks": 5,
///   "previousMonthLinks": 0,
///   "usersGrowth": 50.0,
///   "clicksGrowth": 25.0,
///   "linksGrowth": 100.0
/// }
/// ```
///
/// # Errors
///
/// Returns 500 on store failure.
pub async fn analytics_handler(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let summary = state
        .analytics_service
        .monthly_summary(&Local::now())
        .await?;

    Ok(Json(summary.into()))
}
