mod postgres;
mod reference;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::audit::models::AuditLog;

#[async_trait]
pub trait AbstractAuditLogs: Sync + Send {
    async fn insert_audit_log(&self, entry: &AuditLog) -> Result<()>;

    /// Page through entries, newest first, with the total count
    async fn list_audit_logs(&self, offset: i64, limit: i64) -> Result<(Vec<AuditLog>, i64)>;
}
