use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::{
    AdminUserQueryParams, SetUserRoleDto, SetUserSuspendedDto, UserProfileDto,
};
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta};

/// List users (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(AdminUserQueryParams),
    responses(
        (status = 200, description = "Users, newest first", body = ApiResponse<Vec<UserProfileDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Query(params): Query<AdminUserQueryParams>,
) -> Result<Json<ApiResponse<Vec<UserProfileDto>>>> {
    let (users, total) = service.list(&user, &params).await?;
    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}

/// Change a user's role
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = SetUserRoleDto,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserProfileDto>),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_user_role(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetUserRoleDto>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let updated = service.set_role(&user, id, dto.role).await?;
    Ok(Json(ApiResponse::success(Some(updated), None, None)))
}

/// Suspend or reinstate a user
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/suspend",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = SetUserSuspendedDto,
    responses(
        (status = 200, description = "Suspension updated", body = ApiResponse<UserProfileDto>),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_user_suspended(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetUserSuspendedDto>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let updated = service.set_suspended(&user, id, dto.is_suspended).await?;
    Ok(Json(ApiResponse::success(Some(updated), None, None)))
}

/// Delete a user with their items, matches and notifications
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted".to_string()),
        None,
    )))
}
