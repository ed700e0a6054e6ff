use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    Business,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Business => write!(f, "business"),
        }
    }
}

/// Database model for a registered user.
///
/// Accounts are created by the external registration service; this crate reads
/// them and maintains contact details, role and suspension.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub mobile_number: String,
    pub role: UserRole,
    pub is_suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, name: &str, mobile_number: &str, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            mobile_number: mobile_number.trim().to_string(),
            role,
            is_suspended: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Email address usable for outbound mail, if any
    pub fn contact_email(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty()).then_some(email)
    }
}

/// Name and email displayed next to a user reference
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

/// Filter for admin user listing
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) => {
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}
