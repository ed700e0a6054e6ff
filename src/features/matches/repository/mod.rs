mod postgres;
mod reference;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::matches::models::{ItemMatch, MatchMessage, MatchStatus, MatchStatusChange};

#[async_trait]
pub trait AbstractMatches: Sync + Send {
    /// Insert a match unless one already exists for its normalized pair.
    ///
    /// Returns the stored match and whether it was created by this call.
    async fn insert_match_if_absent(&self, candidate: &ItemMatch) -> Result<(ItemMatch, bool)>;

    async fn fetch_match(&self, id: Uuid) -> Result<Option<ItemMatch>>;

    /// Matches referencing any of `item_ids`, newest first
    async fn find_matches_for_items(&self, item_ids: &[Uuid], limit: i64) -> Result<Vec<ItemMatch>>;

    /// Page through matches, newest first, optionally by status
    async fn list_matches(
        &self,
        status: Option<MatchStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ItemMatch>, i64)>;

    /// Apply a status change only while the match is still in `expected`.
    ///
    /// Returns `None` when the match is missing or its status moved on.
    async fn update_match_status(
        &self,
        id: Uuid,
        expected: MatchStatus,
        change: &MatchStatusChange,
    ) -> Result<Option<ItemMatch>>;

    /// Append to the conversation thread
    async fn append_match_message(
        &self,
        id: Uuid,
        message: &MatchMessage,
    ) -> Result<Option<ItemMatch>>;

    /// Delete every match referencing any of `item_ids`, returning how many went
    async fn delete_matches_for_items(&self, item_ids: &[Uuid]) -> Result<u64>;

    async fn count_matches(&self, status: Option<MatchStatus>) -> Result<i64>;
}
