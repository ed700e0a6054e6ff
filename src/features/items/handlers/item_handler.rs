use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::items::dtos::{BrowseItemsQuery, CreateItemDto, ItemResponseDto, UpdateItemDto};
use crate::features::items::services::ItemService;
use crate::shared::types::ApiResponse;

/// Browse approved items
///
/// Public endpoint. Returns at most 100 items, newest first.
#[utoipa::path(
    get,
    path = "/api/items",
    params(BrowseItemsQuery),
    responses(
        (status = 200, description = "Approved items", body = ApiResponse<Vec<ItemResponseDto>>),
    ),
    tag = "items"
)]
pub async fn browse_items(
    State(service): State<Arc<ItemService>>,
    Query(query): Query<BrowseItemsQuery>,
) -> Result<Json<ApiResponse<Vec<ItemResponseDto>>>> {
    let items = service.browse(query).await?;
    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

/// Get a single approved item
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = ApiResponse<ItemResponseDto>),
        (status = 404, description = "Item not found")
    ),
    tag = "items"
)]
pub async fn get_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    let item = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Report a lost or found item
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = CreateItemDto,
    responses(
        (status = 201, description = "Item reported", body = ApiResponse<ItemResponseDto>),
        (status = 400, description = "Missing fields or contact details"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "items",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_item(
    user: AuthenticatedUser,
    State(service): State<Arc<ItemService>>,
    AppJson(dto): AppJson<CreateItemDto>,
) -> Result<(StatusCode, Json<ApiResponse<ItemResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(item), None, None)),
    ))
}

/// List the caller's items
#[utoipa::path(
    get,
    path = "/api/items/mine",
    responses(
        (status = 200, description = "Caller's items, newest first", body = ApiResponse<Vec<ItemResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "items",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_items(
    user: AuthenticatedUser,
    State(service): State<Arc<ItemService>>,
) -> Result<Json<ApiResponse<Vec<ItemResponseDto>>>> {
    let items = service.list_mine(&user).await?;
    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

/// Edit an item the caller owns
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItemDto,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<ItemResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Item not found or not owned by caller")
    ),
    tag = "items",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_item(
    user: AuthenticatedUser,
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateItemDto>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Mark an item the caller owns as resolved
#[utoipa::path(
    post,
    path = "/api/items/{id}/resolve",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item resolved", body = ApiResponse<ItemResponseDto>),
        (status = 404, description = "Item not found or not owned by caller")
    ),
    tag = "items",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn resolve_item(
    user: AuthenticatedUser,
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    let item = service.resolve(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(item),
        Some("Item marked as resolved".to_string()),
        None,
    )))
}
