use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{User, UserRole};
use crate::shared::types::{default_page, default_page_size, Paginate};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub mobile_number: String,
    pub role: UserRole,
    pub is_suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfileDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            mobile_number: u.mobile_number,
            role: u.role,
            is_suspended: u.is_suspended,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request DTO for replacing the caller's name and contact details
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub mobile_number: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserQueryParams {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Case-insensitive match on name or email
    pub search: Option<String>,
}

impl Paginate for AdminUserQueryParams {
    fn page(&self) -> i64 {
        self.page
    }

    fn page_size(&self) -> i64 {
        self.page_size
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetUserRoleDto {
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetUserSuspendedDto {
    pub is_suspended: bool,
}
