use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::items::models::{Item, ItemKind, ModerationStatus};
use crate::features::users::models::UserSummary;
use crate::shared::types::{default_page, default_page_size, Paginate};

/// Request DTO for reporting a lost or found item.
///
/// Required fields are optional here so that a missing one is reported as a
/// validation error rather than a JSON parse failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemDto {
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,

    #[validate(length(max = 200, message = "Name must not exceed 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "Location must not exceed 500 characters"))]
    pub location: Option<String>,

    /// Day the item was lost or found (YYYY-MM-DD)
    pub date: Option<NaiveDate>,

    /// Image payload, already encoded by the client
    pub image_base64: Option<String>,

    /// Contact email; stored on the reporter's profile when given
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Contact mobile number; stored on the reporter's profile when given
    pub mobile_number: Option<String>,
}

/// Request DTO for an owner editing their item. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemDto {
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Location must be 1-500 characters"))]
    pub location: Option<String>,

    pub date: Option<NaiveDate>,

    pub image_base64: Option<String>,

    pub is_resolved: Option<bool>,
}

/// Query params for public browsing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct BrowseItemsQuery {
    /// Free-text search over name, description and location
    pub q: Option<String>,
    /// Case-insensitive location substring
    pub location: Option<String>,
    /// `lost` or `found`
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
}

/// Open/resolved filter used by the admin item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatusFilter {
    Open,
    Resolved,
}

/// Query params for the admin item list
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminItemQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub status: Option<ItemStatusFilter>,
    pub moderation_status: Option<ModerationStatus>,
    pub search: Option<String>,
}

impl Paginate for AdminItemQueryParams {
    fn page(&self) -> i64 {
        self.page
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}

/// Request DTO for `PATCH /api/admin/items/{id}/moderate`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerateItemDto {
    /// `pending`, `approved` or `rejected`
    pub moderation_status: String,
    #[validate(length(max = 2000, message = "Moderation notes must not exceed 2000 characters"))]
    pub moderation_notes: Option<String>,
}

/// Request DTO for `PATCH /api/admin/items/{id}/status`
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetItemResolvedDto {
    pub is_resolved: bool,
}

/// Response DTO for an item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    pub is_resolved: bool,
    pub moderation_status: ModerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponseDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            kind: item.kind,
            name: item.name,
            category: item.category,
            description: item.description,
            location: item.location,
            date: item.date,
            image_base64: item.image_base64,
            is_resolved: item.is_resolved,
            moderation_status: item.moderation_status,
            moderation_notes: item.moderation_notes,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Admin view of an item with its owner
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminItemResponseDto {
    #[serde(flatten)]
    pub item: ItemResponseDto,
    /// `None` when the owner account no longer exists
    pub owner: Option<UserSummary>,
}
