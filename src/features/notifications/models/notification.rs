use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an in-app notification
#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    /// Free-form type tag, `general` unless stated otherwise
    pub kind: String,
    pub message: String,
    pub read: bool,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient_id: Uuid, kind: &str, message: &str, meta: Option<Value>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            recipient_id,
            kind: kind.to_string(),
            message: message.to_string(),
            read: false,
            meta,
            created_at: now,
            updated_at: now,
        }
    }
}
