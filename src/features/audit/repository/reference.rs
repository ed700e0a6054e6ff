use async_trait::async_trait;

use crate::core::database::ReferenceDb;
use crate::core::error::Result;
use crate::features::audit::models::AuditLog;

use super::AbstractAuditLogs;

#[async_trait]
impl AbstractAuditLogs for ReferenceDb {
    async fn insert_audit_log(&self, entry: &AuditLog) -> Result<()> {
        self.audit_logs.lock().await.push(entry.clone());
        Ok(())
    }

    async fn list_audit_logs(&self, offset: i64, limit: i64) -> Result<(Vec<AuditLog>, i64)> {
        let logs = self.audit_logs.lock().await;
        let total = logs.len() as i64;
        let page = logs
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }
}
