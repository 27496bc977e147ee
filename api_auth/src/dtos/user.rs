use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dtos::auth::UserResponse;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: UserResponse,
    pub subscription: SubscriptionOverview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    NeverSubscribed,
}

/// Subscription block of the dashboard. The remaining-time fields are only
/// present while the subscription is active.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionOverview {
    pub has_active_subscription: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub time_remaining: Option<TimeRemaining>,
    pub days_remaining: Option<i64>,
    pub status: SubscriptionStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    /// Days remaining rounded up; one hour left still counts as one day.
    pub total_days: i64,
}
