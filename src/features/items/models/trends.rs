use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ItemKind;

/// Bucket width for item analytics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Week,
    #[default]
    Month,
}

impl TrendPeriod {
    /// Argument for PostgreSQL `date_trunc`
    pub fn as_sql(&self) -> &'static str {
        match self {
            TrendPeriod::Week => "week",
            TrendPeriod::Month => "month",
        }
    }
}

/// Items reported per bucket and kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KindBucketCount {
    /// Bucket label: `YYYY-MM` for months, `YYYY-Www` for ISO weeks
    pub bucket: String,
    pub kind: ItemKind,
    pub count: i64,
}

/// Resolution ratio per bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionBucket {
    pub bucket: String,
    pub resolved: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Time-bucketed item analytics, newest bucket first
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemTrends {
    pub by_kind: Vec<KindBucketCount>,
    pub resolved: Vec<ResolutionBucket>,
    pub categories: Vec<CategoryCount>,
}
