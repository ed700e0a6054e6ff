use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::dtos::{
    BulkDeleteNotificationsDto, DeletedCountDto, ModifiedCountDto, NotificationResponseDto,
};
use crate::features::notifications::services::NotificationService;
use crate::shared::types::ApiResponse;

/// List the caller's notifications
///
/// Newest first, at most 50.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Caller's notifications", body = ApiResponse<Vec<NotificationResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_notifications(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
) -> Result<Json<ApiResponse<Vec<NotificationResponseDto>>>> {
    let notifications = service.inbox(&user).await?;
    Ok(Json(ApiResponse::success(Some(notifications), None, None)))
}

/// Mark one notification as read
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = ApiResponse<NotificationResponseDto>),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_notification_read(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NotificationResponseDto>>> {
    let notification = service.mark_read(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(notification), None, None)))
}

/// Mark all of the caller's notifications as read
#[utoipa::path(
    patch,
    path = "/api/notifications/mark-all-read",
    responses(
        (status = 200, description = "Notifications marked as read", body = ApiResponse<ModifiedCountDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_all_notifications_read(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
) -> Result<Json<ApiResponse<ModifiedCountDto>>> {
    let modified_count = service.mark_all_read(&user).await?;
    Ok(Json(ApiResponse::success(
        Some(ModifiedCountDto { modified_count }),
        None,
        None,
    )))
}

/// Delete one of the caller's notifications
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_notification(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Notification deleted".to_string()),
        None,
    )))
}

/// Delete several of the caller's notifications
#[utoipa::path(
    delete,
    path = "/api/notifications/bulk",
    request_body = BulkDeleteNotificationsDto,
    responses(
        (status = 200, description = "Notifications deleted", body = ApiResponse<DeletedCountDto>),
        (status = 400, description = "No ids given")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_notifications_bulk(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    AppJson(dto): AppJson<BulkDeleteNotificationsDto>,
) -> Result<Json<ApiResponse<DeletedCountDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let deleted_count = service.delete_many(&user, &dto.ids).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedCountDto { deleted_count }),
        None,
        None,
    )))
}

/// Delete all of the caller's notifications
#[utoipa::path(
    delete,
    path = "/api/notifications/clear-all",
    responses(
        (status = 200, description = "Notifications cleared", body = ApiResponse<DeletedCountDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_all_notifications(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
) -> Result<Json<ApiResponse<DeletedCountDto>>> {
    let deleted_count = service.clear_all(&user).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedCountDto { deleted_count }),
        None,
        None,
    )))
}
