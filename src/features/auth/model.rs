use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::users::models::{User, UserRole};

/// What an operation requires of its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any resolved user
    Authenticated,
    /// A user whose role is `admin`
    Admin,
}

/// Caller identity resolved from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Carried for display; no operation is gated on it
    pub is_suspended: bool,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Single authorization gate used by extractors and services alike
    pub fn authorize(&self, capability: Capability) -> Result<(), AppError> {
        match capability {
            Capability::Authenticated => Ok(()),
            Capability::Admin if self.is_admin() => Ok(()),
            Capability::Admin => Err(AppError::Forbidden("Admin access required".to_string())),
        }
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            is_suspended: user.is_suspended,
        }
    }
}

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: u64,
}
