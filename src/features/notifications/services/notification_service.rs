use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::core::database::Database;
use crate::core::error::{AppError, Result};
use crate::features::audit::models::AuditEntityType;
use crate::features::audit::AuditRecorder;
use crate::features::auth::model::{AuthenticatedUser, Capability};
use crate::features::notifications::dtos::{
    AdminNotificationQueryParams, AdminNotificationResponseDto, DispatchReport,
    NotificationResponseDto, SendNotificationDto,
};
use crate::features::notifications::services::{EmailTemplate, Notice, NotificationDispatcher};
use crate::features::users::models::UserSummary;
use crate::shared::constants::{INBOX_LIMIT, NOTIFICATION_TYPE_GENERAL};
use crate::shared::types::Paginate;

/// Inbox operations for users and notification management for admins
pub struct NotificationService {
    db: Database,
    dispatcher: Arc<NotificationDispatcher>,
    audit: Arc<AuditRecorder>,
}

impl NotificationService {
    pub fn new(
        db: Database,
        dispatcher: Arc<NotificationDispatcher>,
        audit: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            db,
            dispatcher,
            audit,
        }
    }

    /// The caller's most recent notifications, newest first
    pub async fn inbox(&self, actor: &AuthenticatedUser) -> Result<Vec<NotificationResponseDto>> {
        let (notifications, _) = self
            .db
            .list_notifications(Some(actor.id), 0, INBOX_LIMIT)
            .await?;
        Ok(notifications.into_iter().map(Into::into).collect())
    }

    pub async fn mark_read(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<NotificationResponseDto> {
        self.db
            .mark_notification_read(id, actor.id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
    }

    pub async fn mark_all_read(&self, actor: &AuthenticatedUser) -> Result<u64> {
        let modified = self.db.mark_all_notifications_read(actor.id).await?;
        tracing::info!("Notifications marked read: user_id={}, count={}", actor.id, modified);
        Ok(modified)
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        if !self.db.delete_notification(id, Some(actor.id)).await? {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    /// Delete several of the caller's notifications; ids that are not theirs are ignored
    pub async fn delete_many(&self, actor: &AuthenticatedUser, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Err(AppError::Validation(
                "At least one notification id is required".to_string(),
            ));
        }
        self.db.delete_notifications(ids, Some(actor.id)).await
    }

    pub async fn clear_all(&self, actor: &AuthenticatedUser) -> Result<u64> {
        let deleted = self.db.delete_notifications_for(actor.id).await?;
        tracing::info!("Notifications cleared: user_id={}, count={}", actor.id, deleted);
        Ok(deleted)
    }

    // =========================================================================
    // ADMIN
    // =========================================================================

    pub async fn admin_list(
        &self,
        actor: &AuthenticatedUser,
        params: &AdminNotificationQueryParams,
    ) -> Result<(Vec<AdminNotificationResponseDto>, i64)> {
        actor.authorize(Capability::Admin)?;

        let (notifications, total) = self
            .db
            .list_notifications(params.recipient_id, params.offset(), params.limit())
            .await?;

        let mut recipient_ids: Vec<Uuid> = notifications.iter().map(|n| n.recipient_id).collect();
        recipient_ids.sort();
        recipient_ids.dedup();

        let recipients: HashMap<Uuid, UserSummary> = self
            .db
            .fetch_users(&recipient_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let rows = notifications
            .into_iter()
            .map(|n| AdminNotificationResponseDto {
                recipient: recipients.get(&n.recipient_id).cloned(),
                notification: n.into(),
            })
            .collect();

        Ok((rows, total))
    }

    /// Notify a set of users, optionally by email too
    pub async fn admin_send(
        &self,
        actor: &AuthenticatedUser,
        dto: SendNotificationDto,
    ) -> Result<DispatchReport> {
        actor.authorize(Capability::Admin)?;

        let message = dto.message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("Message is required".to_string()));
        }
        if dto.recipient_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one recipient is required".to_string(),
            ));
        }

        let known: HashSet<Uuid> = self
            .db
            .fetch_users(&dto.recipient_ids)
            .await?
            .iter()
            .map(|u| u.id)
            .collect();
        if let Some(missing) = dto.recipient_ids.iter().find(|id| !known.contains(id)) {
            return Err(AppError::NotFound(format!("Recipient {} not found", missing)));
        }

        let notice = Notice {
            kind: dto
                .kind
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .unwrap_or(NOTIFICATION_TYPE_GENERAL)
                .to_string(),
            message: message.to_string(),
            meta: dto.meta,
            email: dto.send_email.then_some(EmailTemplate::General),
        };

        let report = self.dispatcher.notify(&dto.recipient_ids, &notice).await?;

        self.audit.record(
            actor.id,
            "send_notification",
            AuditEntityType::Notification,
            None,
            json!({
                "recipients": report.notifications_created,
                "type": notice.kind,
                "emailsSent": report.emails_sent,
                "totalEmails": report.total_emails,
            }),
        );

        Ok(report)
    }

    pub async fn admin_delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        actor.authorize(Capability::Admin)?;

        if !self.db.delete_notification(id, None).await? {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        tracing::info!("Notification deleted: id={}, by={}", id, actor.id);
        self.audit.record(
            actor.id,
            "delete_notification",
            AuditEntityType::Notification,
            Some(id),
            json!({}),
        );

        Ok(())
    }

    pub async fn admin_delete_many(&self, actor: &AuthenticatedUser, ids: &[Uuid]) -> Result<u64> {
        actor.authorize(Capability::Admin)?;

        if ids.is_empty() {
            return Err(AppError::Validation(
                "At least one notification id is required".to_string(),
            ));
        }

        let deleted = self.db.delete_notifications(ids, None).await?;

        tracing::info!("Notifications deleted: count={}, by={}", deleted, actor.id);
        self.audit.record(
            actor.id,
            "delete_notifications_bulk",
            AuditEntityType::Notification,
            None,
            json!({ "requested": ids.len(), "deletedCount": deleted }),
        );

        Ok(deleted)
    }

    pub async fn admin_clear_for_user(
        &self,
        actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> Result<u64> {
        actor.authorize(Capability::Admin)?;

        let deleted = self.db.delete_notifications_for(user_id).await?;

        tracing::info!(
            "Notifications cleared: user_id={}, count={}, by={}",
            user_id,
            deleted,
            actor.id
        );
        self.audit.record(
            actor.id,
            "clear_user_notifications",
            AuditEntityType::User,
            Some(user_id),
            json!({ "deletedCount": deleted }),
        );

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::models::Notification;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{as_actor, seed_user, settle};
    use std::time::Duration;

    fn service(db: &Database) -> NotificationService {
        let dispatcher = NotificationDispatcher::new(
            db.clone(),
            None,
            Duration::from_secs(1),
            "http://localhost:5173".to_string(),
        );
        NotificationService::new(
            db.clone(),
            Arc::new(dispatcher),
            Arc::new(AuditRecorder::new(db.clone())),
        )
    }

    async fn seed_notification(db: &Database, recipient: Uuid, message: &str) -> Notification {
        let n = Notification::new(recipient, NOTIFICATION_TYPE_GENERAL, message, None);
        db.insert_notifications(std::slice::from_ref(&n)).await.unwrap();
        n
    }

    fn send_dto(recipients: Vec<Uuid>) -> SendNotificationDto {
        SendNotificationDto {
            recipient_ids: recipients,
            message: "  Office closes early today  ".to_string(),
            kind: None,
            meta: None,
            send_email: true,
        }
    }

    #[tokio::test]
    async fn test_users_only_touch_their_own_notifications() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let other = seed_user(&db, UserRole::User).await;
        let mine = seed_notification(&db, owner.id, "Yours").await;
        let theirs = seed_notification(&db, other.id, "Theirs").await;
        let service = service(&db);

        let result = service.mark_read(&as_actor(&owner), theirs.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(service.mark_read(&as_actor(&owner), mine.id).await.unwrap().read);

        let result = service.delete(&as_actor(&owner), theirs.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let deleted = service
            .delete_many(&as_actor(&owner), &[mine.id, theirs.id])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(service.inbox(&as_actor(&other)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_and_clear_all() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let other = seed_user(&db, UserRole::User).await;
        for message in ["One", "Two", "Three"] {
            seed_notification(&db, owner.id, message).await;
        }
        seed_notification(&db, other.id, "Untouched").await;
        let service = service(&db);

        assert_eq!(service.mark_all_read(&as_actor(&owner)).await.unwrap(), 3);
        assert_eq!(service.mark_all_read(&as_actor(&owner)).await.unwrap(), 0);

        assert_eq!(service.clear_all(&as_actor(&owner)).await.unwrap(), 3);
        assert!(service.inbox(&as_actor(&owner)).await.unwrap().is_empty());

        let remaining = service.inbox(&as_actor(&other)).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(!remaining[0].read);
    }

    #[tokio::test]
    async fn test_inbox_is_capped() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        for i in 0..(INBOX_LIMIT + 5) {
            seed_notification(&db, owner.id, &format!("Message {}", i)).await;
        }

        let inbox = service(&db).inbox(&as_actor(&owner)).await.unwrap();
        assert_eq!(inbox.len(), INBOX_LIMIT as usize);
    }

    #[tokio::test]
    async fn test_admin_send_reports_unconfigured_email() {
        let db = Database::reference();
        let admin = seed_user(&db, UserRole::Admin).await;
        let a = seed_user(&db, UserRole::User).await;
        let b = seed_user(&db, UserRole::User).await;

        let report = service(&db)
            .admin_send(&as_actor(&admin), send_dto(vec![a.id, b.id, a.id]))
            .await
            .unwrap();
        settle().await;

        assert_eq!(report.notifications_created, 2);
        assert_eq!(report.emails_sent, 0);
        assert_eq!(report.total_emails, 2);

        let (stored, _) = db.list_notifications(Some(a.id), 0, 10).await.unwrap();
        assert_eq!(stored[0].message, "Office closes early today");
        assert_eq!(stored[0].kind, NOTIFICATION_TYPE_GENERAL);

        let (logs, _) = db.list_audit_logs(0, 10).await.unwrap();
        assert_eq!(logs[0].action, "send_notification");
        assert_eq!(logs[0].meta["totalEmails"], 2);
    }

    #[tokio::test]
    async fn test_admin_send_rejects_unknown_recipient() {
        let db = Database::reference();
        let admin = seed_user(&db, UserRole::Admin).await;

        let result = service(&db)
            .admin_send(&as_actor(&admin), send_dto(vec![Uuid::now_v7()]))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(db.list_notifications(None, 0, 10).await.unwrap().1, 0);
    }

    #[tokio::test]
    async fn test_admin_operations_require_admin() {
        let db = Database::reference();
        let user = seed_user(&db, UserRole::User).await;
        let service = service(&db);

        let result = service.admin_send(&as_actor(&user), send_dto(vec![user.id])).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let result = service.admin_clear_for_user(&as_actor(&user), user.id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_bulk_and_clear_are_audited() {
        let db = Database::reference();
        let admin = seed_user(&db, UserRole::Admin).await;
        let user = seed_user(&db, UserRole::User).await;
        let first = seed_notification(&db, user.id, "First").await;
        seed_notification(&db, user.id, "Second").await;
        seed_notification(&db, user.id, "Third").await;
        let service = service(&db);

        let deleted = service
            .admin_delete_many(&as_actor(&admin), &[first.id, Uuid::now_v7()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let cleared = service
            .admin_clear_for_user(&as_actor(&admin), user.id)
            .await
            .unwrap();
        assert_eq!(cleared, 2);
        settle().await;

        let (logs, total) = db.list_audit_logs(0, 10).await.unwrap();
        assert_eq!(total, 2);
        let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
        assert!(actions.contains(&"delete_notifications_bulk"));
        assert!(actions.contains(&"clear_user_notifications"));
    }

    #[tokio::test]
    async fn test_admin_list_attaches_recipient() {
        let db = Database::reference();
        let admin = seed_user(&db, UserRole::Admin).await;
        let a = seed_user(&db, UserRole::User).await;
        let b = seed_user(&db, UserRole::User).await;
        seed_notification(&db, a.id, "For a").await;
        seed_notification(&db, b.id, "For b").await;

        let params = AdminNotificationQueryParams {
            page: 1,
            page_size: 10,
            recipient_id: Some(b.id),
        };
        let (rows, total) = service(&db).admin_list(&as_actor(&admin), &params).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(rows[0].notification.message, "For b");
        assert_eq!(rows[0].recipient.as_ref().unwrap().id, b.id);
    }
}
