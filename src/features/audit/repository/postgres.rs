use async_trait::async_trait;

use crate::core::database::PostgresDb;
use crate::core::error::{AppError, Result};
use crate::features::audit::models::AuditLog;

use super::AbstractAuditLogs;

#[async_trait]
impl AbstractAuditLogs for PostgresDb {
    async fn insert_audit_log(&self, entry: &AuditLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, actor_id, action, entity_type, entity_id, meta, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.actor_id)
        .bind(&entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.meta)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(())
    }

    async fn list_audit_logs(&self, offset: i64, limit: i64) -> Result<(Vec<AuditLog>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, actor_id, action, entity_type, entity_id, meta, created_at
            FROM audit_logs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list audit logs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((logs, total))
    }
}
