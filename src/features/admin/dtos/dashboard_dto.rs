use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::items::models::TrendPeriod;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatsDto {
    pub total: i64,
    pub open: i64,
    pub resolved: i64,
    /// Open items reported as lost
    pub lost_open: i64,
    /// Open items reported as found
    pub found_open: i64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatsDto {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub rejected: i64,
    pub resolved: i64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct UserStatsDto {
    pub total: i64,
}

/// Counters shown on the admin dashboard
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DashboardStatsDto {
    pub items: ItemStatsDto,
    pub matches: MatchStatsDto,
    pub users: UserStatsDto,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TrendsQuery {
    /// `month` (default) or `week`
    pub period: Option<TrendPeriod>,
    /// Number of buckets to report (default 12, max 52)
    pub limit: Option<i64>,
}
