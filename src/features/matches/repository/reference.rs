use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::database::ReferenceDb;
use crate::core::error::Result;
use crate::features::matches::models::{ItemMatch, MatchMessage, MatchStatus, MatchStatusChange};

use super::AbstractMatches;

#[async_trait]
impl AbstractMatches for ReferenceDb {
    async fn insert_match_if_absent(&self, candidate: &ItemMatch) -> Result<(ItemMatch, bool)> {
        let mut matches = self.matches.lock().await;
        if let Some(existing) = matches.values().find(|m| {
            m.item_a_id == candidate.item_a_id && m.item_b_id == candidate.item_b_id
        }) {
            return Ok((existing.clone(), false));
        }

        matches.insert(candidate.id, candidate.clone());
        Ok((candidate.clone(), true))
    }

    async fn fetch_match(&self, id: Uuid) -> Result<Option<ItemMatch>> {
        let matches = self.matches.lock().await;
        Ok(matches.get(&id).cloned())
    }

    async fn find_matches_for_items(&self, item_ids: &[Uuid], limit: i64) -> Result<Vec<ItemMatch>> {
        let matches = self.matches.lock().await;
        let mut found: Vec<ItemMatch> = matches
            .values()
            .filter(|m| item_ids.iter().any(|id| m.references(*id)))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }

    async fn list_matches(
        &self,
        status: Option<MatchStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ItemMatch>, i64)> {
        let matches = self.matches.lock().await;
        let mut found: Vec<ItemMatch> = matches
            .values()
            .filter(|m| status.is_none_or(|s| s == m.status))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = found.len() as i64;
        let page = found
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn update_match_status(
        &self,
        id: Uuid,
        expected: MatchStatus,
        change: &MatchStatusChange,
    ) -> Result<Option<ItemMatch>> {
        let mut matches = self.matches.lock().await;
        Ok(matches
            .get_mut(&id)
            .filter(|m| m.status == expected)
            .map(|m| {
                change.apply(m);
                m.clone()
            }))
    }

    async fn append_match_message(
        &self,
        id: Uuid,
        message: &MatchMessage,
    ) -> Result<Option<ItemMatch>> {
        let mut matches = self.matches.lock().await;
        Ok(matches.get_mut(&id).map(|m| {
            m.messages.0.push(message.clone());
            m.updated_at = Utc::now();
            m.clone()
        }))
    }

    async fn delete_matches_for_items(&self, item_ids: &[Uuid]) -> Result<u64> {
        let mut matches = self.matches.lock().await;
        let before = matches.len();
        matches.retain(|_, m| !item_ids.iter().any(|id| m.references(*id)));
        Ok((before - matches.len()) as u64)
    }

    async fn count_matches(&self, status: Option<MatchStatus>) -> Result<i64> {
        let matches = self.matches.lock().await;
        Ok(matches
            .values()
            .filter(|m| status.is_none_or(|s| s == m.status))
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirm() -> MatchStatusChange {
        MatchStatusChange {
            status: MatchStatus::Confirmed,
            admin_notes: None,
            resolved_by: None,
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn test_status_update_loses_when_status_moved_on() {
        let db = ReferenceDb::default();
        let (m, _) = db
            .insert_match_if_absent(&ItemMatch::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7(), None))
            .await
            .unwrap();

        let first = db
            .update_match_status(m.id, MatchStatus::Pending, &confirm())
            .await
            .unwrap();
        assert_eq!(first.unwrap().status, MatchStatus::Confirmed);

        let second = db
            .update_match_status(m.id, MatchStatus::Pending, &confirm())
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_insert_if_absent_ignores_argument_order() {
        let db = ReferenceDb::default();
        let (x, y, by) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());

        let (first, created) = db
            .insert_match_if_absent(&ItemMatch::new(x, y, by, None))
            .await
            .unwrap();
        assert!(created);

        let (second, created) = db
            .insert_match_if_absent(&ItemMatch::new(y, x, by, Some("again".to_string())))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert!(second.notes.is_none());
        assert_eq!(db.count_matches(None).await.unwrap(), 1);
    }
}
