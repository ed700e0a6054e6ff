use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::database::PostgresDb;
use crate::core::error::{AppError, Result};
use crate::features::notifications::models::Notification;

use super::AbstractNotifications;

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, kind, message, read, meta, created_at, updated_at";

#[async_trait]
impl AbstractNotifications for PostgresDb {
    async fn insert_notifications(&self, notifications: &[Notification]) -> Result<()> {
        if notifications.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO notifications (id, recipient_id, kind, message, read, meta, created_at, updated_at) ",
        );
        builder.push_values(notifications, |mut row, n| {
            row.push_bind(n.id)
                .push_bind(n.recipient_id)
                .push_bind(n.kind.clone())
                .push_bind(n.message.clone())
                .push_bind(n.read)
                .push_bind(n.meta.clone())
                .push_bind(n.created_at)
                .push_bind(n.updated_at);
        });

        builder.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to insert notifications: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn list_notifications(
        &self,
        recipient_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE ($1::uuid IS NULL OR recipient_id = $1)",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let query = format!(
            r#"
            SELECT {}
            FROM notifications
            WHERE ($1::uuid IS NULL OR recipient_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            NOTIFICATION_COLUMNS
        );
        let notifications = sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list notifications: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((notifications, total))
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Notification>> {
        let query = format!(
            r#"
            UPDATE notifications SET read = TRUE, updated_at = NOW()
            WHERE id = $1 AND recipient_id = $2
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(recipient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, updated_at = NOW() WHERE recipient_id = $1 AND NOT read",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    async fn delete_notification(&self, id: Uuid, recipient_id: Option<Uuid>) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id = $1 AND ($2::uuid IS NULL OR recipient_id = $2)",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_notifications(
        &self,
        ids: &[Uuid],
        recipient_id: Option<Uuid>,
    ) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "DELETE FROM notifications WHERE id = ANY($1) AND ($2::uuid IS NULL OR recipient_id = $2)",
        )
        .bind(ids)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    async fn delete_notifications_for(&self, recipient_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(recipient_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
