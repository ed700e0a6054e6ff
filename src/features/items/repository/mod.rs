mod postgres;
mod reference;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::items::models::{Item, ItemFilter, ItemPatch, ItemTrends, ModerationStatus, TrendPeriod};

#[async_trait]
pub trait AbstractItems: Sync + Send {
    /// Insert a new item
    async fn insert_item(&self, item: &Item) -> Result<()>;

    /// Fetch an item by id
    async fn fetch_item(&self, id: Uuid) -> Result<Option<Item>>;

    /// Fetch every item whose id is in `ids`, in no particular order
    async fn fetch_items(&self, ids: &[Uuid]) -> Result<Vec<Item>>;

    /// Find items matching a filter, newest first, with the total matching count
    async fn find_items(&self, filter: &ItemFilter) -> Result<(Vec<Item>, i64)>;

    /// Ids of every item owned by a user
    async fn item_ids_by_owner(&self, owner: Uuid) -> Result<Vec<Uuid>>;

    /// Apply a patch. When `owner` is given the item must also belong to them,
    /// otherwise nothing is written and `None` is returned.
    async fn update_item(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        patch: &ItemPatch,
    ) -> Result<Option<Item>>;

    async fn moderate_item(
        &self,
        id: Uuid,
        status: ModerationStatus,
        notes: Option<&str>,
    ) -> Result<Option<Item>>;

    /// Delete an item, returning it if it existed
    async fn delete_item(&self, id: Uuid) -> Result<Option<Item>>;

    /// Delete every item owned by a user, returning the deleted ids
    async fn delete_items_by_owner(&self, owner: Uuid) -> Result<Vec<Uuid>>;

    /// Count items matching a filter
    async fn count_items(&self, filter: &ItemFilter) -> Result<i64>;

    /// Time-bucketed analytics over the most recent `buckets` periods
    async fn item_trends(&self, period: TrendPeriod, buckets: i64) -> Result<ItemTrends>;
}
