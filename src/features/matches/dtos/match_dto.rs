use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::items::dtos::ItemResponseDto;
use crate::features::matches::models::{MatchMessage, MatchStatus};
use crate::features::users::models::UserSummary;
use crate::shared::types::{default_page, default_page_size, Paginate};

/// Request DTO for proposing that two items are the same object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchDto {
    pub item_a_id: Uuid,
    pub item_b_id: Uuid,

    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchStatusDto {
    pub status: MatchStatus,

    #[validate(length(max = 2000, message = "Admin notes must not exceed 2000 characters"))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AppendMessageDto {
    /// Trimmed before storing; must be 1-2000 characters
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMatchEmailDto {
    /// Replaces the default in-app message and is quoted in the email
    #[validate(length(max = 2000, message = "Message must not exceed 2000 characters"))]
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminMatchQueryParams {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub status: Option<MatchStatus>,
}

impl Paginate for AdminMatchQueryParams {
    fn page(&self) -> i64 {
        self.page
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}

/// An item as shown inside a match, with its owner
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchItemDto {
    #[serde(flatten)]
    pub item: ItemResponseDto,
    pub owner: Option<UserSummary>,
}

/// A match with its items and people resolved for display.
///
/// Item and user fields are `None` when the referenced record is gone.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponseDto {
    pub id: Uuid,
    pub item_a_id: Uuid,
    pub item_b_id: Uuid,
    pub item_a: Option<MatchItemDto>,
    pub item_b: Option<MatchItemDto>,
    pub status: MatchStatus,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub created_by: Uuid,
    pub creator: Option<UserSummary>,
    pub resolved_by: Option<Uuid>,
    pub resolver: Option<UserSummary>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub messages: Vec<MatchMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
