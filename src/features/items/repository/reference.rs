use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use uuid::Uuid;

use crate::core::database::ReferenceDb;
use crate::core::error::Result;
use crate::features::items::models::{
    CategoryCount, Item, ItemFilter, ItemKind, ItemPatch, ItemTrends, KindBucketCount,
    ModerationStatus, ResolutionBucket, TrendPeriod,
};

use super::AbstractItems;

fn bucket_label(period: TrendPeriod, at: DateTime<Utc>) -> String {
    match period {
        TrendPeriod::Month => format!("{:04}-{:02}", at.year(), at.month()),
        TrendPeriod::Week => {
            let week = at.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
    }
}

/// Earliest instant still inside the window of `buckets` periods ending now
fn window_start(period: TrendPeriod, buckets: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    let back = (buckets - 1).max(0);
    match period {
        TrendPeriod::Month => {
            let first_of_month = now
                .date_naive()
                .with_day(1)
                .unwrap_or_else(|| now.date_naive());
            first_of_month
                .checked_sub_months(Months::new(back as u32))
                .unwrap_or(first_of_month)
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or(now)
        }
        TrendPeriod::Week => {
            let monday = now.date_naive()
                - Duration::days(now.weekday().num_days_from_monday() as i64);
            (monday - Duration::weeks(back))
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or(now)
        }
    }
}

#[async_trait]
impl AbstractItems for ReferenceDb {
    async fn insert_item(&self, item: &Item) -> Result<()> {
        let mut items = self.items.lock().await;
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn fetch_item(&self, id: Uuid) -> Result<Option<Item>> {
        let items = self.items.lock().await;
        Ok(items.get(&id).cloned())
    }

    async fn fetch_items(&self, ids: &[Uuid]) -> Result<Vec<Item>> {
        let items = self.items.lock().await;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn find_items(&self, filter: &ItemFilter) -> Result<(Vec<Item>, i64)> {
        let items = self.items.lock().await;
        let mut matching: Vec<Item> = items.values().filter(|i| filter.matches(i)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn item_ids_by_owner(&self, owner: Uuid) -> Result<Vec<Uuid>> {
        let items = self.items.lock().await;
        Ok(items
            .values()
            .filter(|i| i.user_id == owner)
            .map(|i| i.id)
            .collect())
    }

    async fn update_item(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        patch: &ItemPatch,
    ) -> Result<Option<Item>> {
        let mut items = self.items.lock().await;
        Ok(items
            .get_mut(&id)
            .filter(|item| owner.is_none_or(|owner| owner == item.user_id))
            .map(|item| {
                patch.apply(item);
                item.clone()
            }))
    }

    async fn moderate_item(
        &self,
        id: Uuid,
        status: ModerationStatus,
        notes: Option<&str>,
    ) -> Result<Option<Item>> {
        let mut items = self.items.lock().await;
        Ok(items.get_mut(&id).map(|item| {
            item.moderation_status = status;
            item.moderation_notes = notes.map(str::to_string);
            item.updated_at = Utc::now();
            item.clone()
        }))
    }

    async fn delete_item(&self, id: Uuid) -> Result<Option<Item>> {
        let mut items = self.items.lock().await;
        Ok(items.remove(&id))
    }

    async fn delete_items_by_owner(&self, owner: Uuid) -> Result<Vec<Uuid>> {
        let mut items = self.items.lock().await;
        let ids: Vec<Uuid> = items
            .values()
            .filter(|i| i.user_id == owner)
            .map(|i| i.id)
            .collect();
        for id in &ids {
            items.remove(id);
        }
        Ok(ids)
    }

    async fn count_items(&self, filter: &ItemFilter) -> Result<i64> {
        let items = self.items.lock().await;
        Ok(items.values().filter(|i| filter.matches(i)).count() as i64)
    }

    async fn item_trends(&self, period: TrendPeriod, buckets: i64) -> Result<ItemTrends> {
        let items = self.items.lock().await;
        let since = window_start(period, buckets, Utc::now());

        let mut by_kind: BTreeMap<(String, &'static str), (ItemKind, i64)> = BTreeMap::new();
        let mut resolved: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        let mut categories: HashMap<String, i64> = HashMap::new();

        for item in items.values().filter(|i| i.created_at >= since) {
            let bucket = bucket_label(period, item.created_at);
            let kind_key = match item.kind {
                ItemKind::Lost => "lost",
                ItemKind::Found => "found",
            };

            by_kind
                .entry((bucket.clone(), kind_key))
                .or_insert((item.kind, 0))
                .1 += 1;

            let entry = resolved.entry(bucket).or_insert((0, 0));
            if item.is_resolved {
                entry.0 += 1;
            }
            entry.1 += 1;

            if let Some(category) = item.category.as_deref().filter(|c| !c.is_empty()) {
                *categories.entry(category.to_string()).or_insert(0) += 1;
            }
        }

        let mut by_kind: Vec<KindBucketCount> = by_kind
            .into_iter()
            .map(|((bucket, _), (kind, count))| KindBucketCount { bucket, kind, count })
            .collect();
        by_kind.sort_by(|a, b| b.bucket.cmp(&a.bucket));

        let resolved = resolved
            .into_iter()
            .rev()
            .map(|(bucket, (resolved, total))| ResolutionBucket {
                bucket,
                resolved,
                total,
            })
            .collect();

        let mut categories: Vec<CategoryCount> = categories
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
        categories.truncate(10);

        Ok(ItemTrends {
            by_kind,
            resolved,
            categories,
        })
    }
}
