use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of entity an audit entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "audit_entity_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditEntityType {
    Item,
    Match,
    User,
    Setting,
    Notification,
}

/// Write-once record of an administrative action
#[derive(Debug, Clone, FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub entity_type: AuditEntityType,
    pub entity_id: Option<Uuid>,
    pub meta: Value,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        actor_id: Uuid,
        action: &str,
        entity_type: AuditEntityType,
        entity_id: Option<Uuid>,
        meta: Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            actor_id,
            action: action.to_string(),
            entity_type,
            entity_id,
            meta,
            created_at: Utc::now(),
        }
    }
}
