use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::audit::models::{AuditEntityType, AuditLog};
use crate::features::users::models::UserSummary;

/// Audit entry with the acting admin attached
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponseDto {
    pub id: Uuid,
    pub action: String,
    pub entity_type: AuditEntityType,
    pub entity_id: Option<Uuid>,
    #[schema(value_type = Object)]
    pub meta: Value,
    /// `None` when the actor account no longer exists
    pub actor: Option<UserSummary>,
    pub actor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl AuditLogResponseDto {
    pub fn new(log: AuditLog, actor: Option<UserSummary>) -> Self {
        Self {
            id: log.id,
            action: log.action,
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            meta: log.meta,
            actor,
            actor_id: log.actor_id,
            created_at: log.created_at,
        }
    }
}
