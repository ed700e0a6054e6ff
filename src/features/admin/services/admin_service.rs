use crate::core::database::Database;
use crate::core::error::Result;
use crate::features::admin::dtos::{
    DashboardStatsDto, ItemStatsDto, MatchStatsDto, TrendsQuery, UserStatsDto,
};
use crate::features::auth::model::{AuthenticatedUser, Capability};
use crate::features::items::models::{ItemFilter, ItemKind, ItemTrends};
use crate::features::matches::models::MatchStatus;

const DEFAULT_TREND_BUCKETS: i64 = 12;
const MAX_TREND_BUCKETS: i64 = 52;

/// Service for admin dashboard queries
pub struct AdminService {
    db: Database,
}

impl AdminService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn open_items(kind: Option<ItemKind>) -> ItemFilter {
        ItemFilter {
            kind,
            is_resolved: Some(false),
            ..Default::default()
        }
    }

    /// Item, match and user counters
    pub async fn stats(&self, actor: &AuthenticatedUser) -> Result<DashboardStatsDto> {
        actor.authorize(Capability::Admin)?;

        let db = &self.db;
        let all_items = ItemFilter::default();
        let open_items = Self::open_items(None);
        let resolved_items = ItemFilter {
            is_resolved: Some(true),
            ..Default::default()
        };
        let lost_items = Self::open_items(Some(ItemKind::Lost));
        let found_items = Self::open_items(Some(ItemKind::Found));

        let (total, open, resolved, lost_open, found_open) = tokio::try_join!(
            db.count_items(&all_items),
            db.count_items(&open_items),
            db.count_items(&resolved_items),
            db.count_items(&lost_items),
            db.count_items(&found_items),
        )?;

        let (matches_total, pending, confirmed, rejected, matches_resolved, users) = tokio::try_join!(
            db.count_matches(None),
            db.count_matches(Some(MatchStatus::Pending)),
            db.count_matches(Some(MatchStatus::Confirmed)),
            db.count_matches(Some(MatchStatus::Rejected)),
            db.count_matches(Some(MatchStatus::Resolved)),
            db.count_users(),
        )?;

        Ok(DashboardStatsDto {
            items: ItemStatsDto {
                total,
                open,
                resolved,
                lost_open,
                found_open,
            },
            matches: MatchStatsDto {
                total: matches_total,
                pending,
                confirmed,
                rejected,
                resolved: matches_resolved,
            },
            users: UserStatsDto { total: users },
        })
    }

    /// Time-bucketed item analytics
    pub async fn trends(&self, actor: &AuthenticatedUser, query: &TrendsQuery) -> Result<ItemTrends> {
        actor.authorize(Capability::Admin)?;

        let period = query.period.unwrap_or_default();
        let buckets = query
            .limit
            .unwrap_or(DEFAULT_TREND_BUCKETS)
            .clamp(1, MAX_TREND_BUCKETS);

        self.db.item_trends(period, buckets).await
    }
}
