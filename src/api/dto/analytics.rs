//! DTOs for the monthly analytics endpoint.

use serde::Serialize;

use crate::application::services::MonthlySummary;

/// Current vs previous calendar month.
///
/// Growth values are percentages, `100.0` when the previous month is zero.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
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

impl From<MonthlySummary> for AnalyticsResponse {
    fn from(s: MonthlySummary) -> Self {
        Self {
            current_month_users: s.current_month_users,
            previous_month_users: s.previous_month_users,
            current_month_clicks: s.current_month_clicks,
            previous_month_clicks: s.previous_month_clicks,
            current_month_links: s.current_month_links,
            previous_month_links: s.previous_month_links,
            users_growth: s.users_growth,
            clicks_growth: s.clicks_growth,
            links_growth: s.links_growth,
        }
    }
}
