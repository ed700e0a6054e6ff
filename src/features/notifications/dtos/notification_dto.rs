use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::notifications::models::Notification;
use crate::features::users::models::UserSummary;
use crate::shared::types::{default_page, default_page_size, Paginate};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponseDto {
    pub id: Uuid,
    pub recipient_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub read: bool,
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponseDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            recipient_id: n.recipient_id,
            kind: n.kind,
            message: n.message,
            read: n.read,
            meta: n.meta,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

/// Notification with its recipient attached, for the admin console
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotificationResponseDto {
    #[serde(flatten)]
    pub notification: NotificationResponseDto,
    /// `None` when the recipient account no longer exists
    pub recipient: Option<UserSummary>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteNotificationsDto {
    #[validate(length(min = 1, message = "At least one notification id is required"))]
    pub ids: Vec<Uuid>,
}

/// Admin request to notify one or more users
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationDto {
    #[validate(length(min = 1, message = "At least one recipient is required"))]
    pub recipient_ids: Vec<Uuid>,

    #[validate(length(min = 1, max = 1000, message = "Message must be 1-1000 characters"))]
    pub message: String,

    /// Defaults to `general`
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Type must be 1-50 characters"))]
    pub kind: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,

    /// Also email every recipient that has an address on file
    #[serde(default)]
    pub send_email: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotificationQueryParams {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Only notifications addressed to this user
    pub recipient_id: Option<Uuid>,
}

impl Paginate for AdminNotificationQueryParams {
    fn page(&self) -> i64 {
        self.page
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}

/// Outcome of one email attempt
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailDeliveryResult {
    pub email: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl EmailDeliveryResult {
    pub fn delivered(email: String, message_id: String) -> Self {
        Self {
            email,
            success: true,
            error: None,
            message_id: Some(message_id),
        }
    }

    pub fn failed(email: String, error: impl Into<String>) -> Self {
        Self {
            email,
            success: false,
            error: Some(error.into()),
            message_id: None,
        }
    }
}

/// What a dispatch produced: in-app records plus one result per email attempt
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub notifications_created: usize,
    pub results: Vec<EmailDeliveryResult>,
    pub emails_sent: usize,
    pub total_emails: usize,
}

impl DispatchReport {
    pub fn new(notifications_created: usize, results: Vec<EmailDeliveryResult>) -> Self {
        Self {
            notifications_created,
            emails_sent: results.iter().filter(|r| r.success).count(),
            total_emails: results.len(),
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCountDto {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedCountDto {
    pub modified_count: u64,
}
