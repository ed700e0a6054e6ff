//! Authorization guards for handlers.
//!
//! Guards read the [`AuthenticatedUser`] placed in request extensions by the
//! auth middleware and run it through [`AuthenticatedUser::authorize`].

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Capability};
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for admin-only handlers.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        user.authorize(Capability::Admin)?;

        Ok(RequireAdmin(user.clone()))
    }
}
