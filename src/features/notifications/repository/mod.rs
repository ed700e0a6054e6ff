mod postgres;
mod reference;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::notifications::models::Notification;

#[async_trait]
pub trait AbstractNotifications: Sync + Send {
    /// Insert a batch of notifications, all or nothing
    async fn insert_notifications(&self, notifications: &[Notification]) -> Result<()>;

    /// Page through notifications, newest first, optionally for one recipient
    async fn list_notifications(
        &self,
        recipient_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Notification>, i64)>;

    /// Mark one of a recipient's notifications as read
    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Notification>>;

    /// Mark every unread notification of a recipient as read, returning how many changed
    async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<u64>;

    /// Delete one notification; when `recipient_id` is given it must also match
    async fn delete_notification(&self, id: Uuid, recipient_id: Option<Uuid>) -> Result<bool>;

    /// Delete notifications by id; when `recipient_id` is given only theirs are touched
    async fn delete_notifications(&self, ids: &[Uuid], recipient_id: Option<Uuid>)
        -> Result<u64>;

    /// Delete everything addressed to a recipient
    async fn delete_notifications_for(&self, recipient_id: Uuid) -> Result<u64>;
}
