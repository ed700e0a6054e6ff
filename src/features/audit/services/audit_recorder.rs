use std::collections::HashMap;

use serde_json::Value;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::database::Database;
use crate::core::error::Result;
use crate::features::audit::dtos::AuditLogResponseDto;
use crate::features::audit::models::{AuditEntityType, AuditLog};
use crate::features::users::models::UserSummary;

/// Records administrative actions without blocking the caller
pub struct AuditRecorder {
    db: Database,
}

impl AuditRecorder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record an action on a detached task.
    ///
    /// Failures are logged and dropped. The returned handle is only useful to
    /// callers that want to wait for the write, which request handlers never do.
    pub fn record(
        &self,
        actor_id: Uuid,
        action: &str,
        entity_type: AuditEntityType,
        entity_id: Option<Uuid>,
        meta: Value,
    ) -> JoinHandle<()> {
        let entry = AuditLog::new(actor_id, action, entity_type, entity_id, meta);
        let db = self.db.clone();

        tokio::spawn(async move {
            if let Err(e) = db.insert_audit_log(&entry).await {
                tracing::warn!(
                    "Failed to record audit entry: action={}, actor={}, error={}",
                    entry.action,
                    entry.actor_id,
                    e
                );
            }
        })
    }

    /// Page through audit entries, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<AuditLogResponseDto>, i64)> {
        let (logs, total) = self.db.list_audit_logs(offset, limit).await?;

        let mut actor_ids: Vec<Uuid> = logs.iter().map(|l| l.actor_id).collect();
        actor_ids.sort();
        actor_ids.dedup();

        let actors: HashMap<Uuid, UserSummary> = self
            .db
            .fetch_users(&actor_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let entries = logs
            .into_iter()
            .map(|log| {
                let actor = actors.get(&log.actor_id).cloned();
                AuditLogResponseDto::new(log, actor)
            })
            .collect();

        Ok((entries, total))
    }
}
