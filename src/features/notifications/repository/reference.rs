use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::database::ReferenceDb;
use crate::core::error::Result;
use crate::features::notifications::models::Notification;

use super::AbstractNotifications;

#[async_trait]
impl AbstractNotifications for ReferenceDb {
    async fn insert_notifications(&self, notifications: &[Notification]) -> Result<()> {
        let mut store = self.notifications.lock().await;
        for n in notifications {
            store.insert(n.id, n.clone());
        }
        Ok(())
    }

    async fn list_notifications(
        &self,
        recipient_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        let store = self.notifications.lock().await;
        let mut found: Vec<Notification> = store
            .values()
            .filter(|n| recipient_id.is_none_or(|r| r == n.recipient_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = found.len() as i64;
        let page = found
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Notification>> {
        let mut store = self.notifications.lock().await;
        Ok(store
            .get_mut(&id)
            .filter(|n| n.recipient_id == recipient_id)
            .map(|n| {
                n.read = true;
                n.updated_at = Utc::now();
                n.clone()
            }))
    }

    async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<u64> {
        let mut store = self.notifications.lock().await;
        let now = Utc::now();
        let mut modified = 0;
        for n in store
            .values_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.read)
        {
            n.read = true;
            n.updated_at = now;
            modified += 1;
        }
        Ok(modified)
    }

    async fn delete_notification(&self, id: Uuid, recipient_id: Option<Uuid>) -> Result<bool> {
        let mut store = self.notifications.lock().await;
        let owned = store
            .get(&id)
            .is_some_and(|n| recipient_id.is_none_or(|r| r == n.recipient_id));
        if owned {
            store.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_notifications(
        &self,
        ids: &[Uuid],
        recipient_id: Option<Uuid>,
    ) -> Result<u64> {
        let mut store = self.notifications.lock().await;
        let before = store.len();
        store.retain(|id, n| {
            !(ids.contains(id) && recipient_id.is_none_or(|r| r == n.recipient_id))
        });
        Ok((before - store.len()) as u64)
    }

    async fn delete_notifications_for(&self, recipient_id: Uuid) -> Result<u64> {
        let mut store = self.notifications.lock().await;
        let before = store.len();
        store.retain(|_, n| n.recipient_id != recipient_id);
        Ok((before - store.len()) as u64)
    }
}
