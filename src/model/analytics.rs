use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 16.0)]
    pub total_hours: f64,
    #[schema(example = 2)]
    pub unique_users: usize,
    #[schema(example = 2)]
    pub total_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStat {
    #[schema(example = "user-1")]
    pub user_id: String,
    /// Display name, absent when the user is no longer in the directory
    #[schema(example = "John Doe")]
    pub user_name: Option<String>,
    #[schema(example = 8.0)]
    pub total_hours: f64,
    #[schema(example = 1)]
    pub total_entries: usize,
    #[schema(example = 8.0)]
    pub average_hours_per_entry: f64,
}

/// Aggregates over closed entries clocked in inside the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    #[schema(example = 7)]
    pub window_days: u32,
    #[schema(example = 2)]
    pub total_entries: usize,
    #[schema(example = 16.0)]
    pub total_hours: f64,
    #[schema(example = 2.29)]
    pub average_hours_per_day: f64,
    #[schema(example = 2)]
    pub unique_users_count: usize,
    /// Ascending by date
    pub daily_stats: Vec<DailyStat>,
    /// Descending by total hours
    pub user_stats: Vec<UserStat>,
}
