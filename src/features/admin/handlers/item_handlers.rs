use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::items::dtos::{
    AdminItemQueryParams, AdminItemResponseDto, ModerateItemDto, SetItemResolvedDto,
};
use crate::features::items::services::ItemService;
use crate::shared::types::{ApiResponse, Meta};

/// List all items (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/items",
    params(AdminItemQueryParams),
    responses(
        (status = 200, description = "Items with owners", body = ApiResponse<Vec<AdminItemResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_items(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ItemService>>,
    Query(params): Query<AdminItemQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminItemResponseDto>>>> {
    let (items, total) = service.admin_list(&user, &params).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get any item with its owner
#[utoipa::path(
    get,
    path = "/api/admin/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = ApiResponse<AdminItemResponseDto>),
        (status = 404, description = "Item not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_item(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdminItemResponseDto>>> {
    let item = service.admin_get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Open or close an item
#[utoipa::path(
    patch,
    path = "/api/admin/items/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = SetItemResolvedDto,
    responses(
        (status = 200, description = "Item status updated", body = ApiResponse<AdminItemResponseDto>),
        (status = 404, description = "Item not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_item_status(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetItemResolvedDto>,
) -> Result<Json<ApiResponse<AdminItemResponseDto>>> {
    let item = service.set_resolved(&user, id, dto.is_resolved).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Approve or reject an item
#[utoipa::path(
    patch,
    path = "/api/admin/items/{id}/moderate",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = ModerateItemDto,
    responses(
        (status = 200, description = "Item moderated", body = ApiResponse<AdminItemResponseDto>),
        (status = 400, description = "Invalid moderation status"),
        (status = 404, description = "Item not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn moderate_item(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ModerateItemDto>,
) -> Result<Json<ApiResponse<AdminItemResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.moderate(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Delete an item and every match referencing it
#[utoipa::path(
    delete,
    path = "/api/admin/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_item(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Item deleted".to_string()),
        None,
    )))
}
