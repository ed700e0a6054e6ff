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
use crate::features::notifications::dtos::{
    AdminNotificationQueryParams, AdminNotificationResponseDto, BulkDeleteNotificationsDto,
    DeletedCountDto, DispatchReport, SendNotificationDto,
};
use crate::features::notifications::services::NotificationService;
use crate::shared::types::{ApiResponse, Meta};

/// List notifications across all users (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/notifications",
    params(AdminNotificationQueryParams),
    responses(
        (status = 200, description = "Notifications with recipients", body = ApiResponse<Vec<AdminNotificationResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_notifications(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<NotificationService>>,
    Query(params): Query<AdminNotificationQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminNotificationResponseDto>>>> {
    let (notifications, total) = service.admin_list(&user, &params).await?;
    Ok(Json(ApiResponse::success(
        Some(notifications),
        None,
        Some(Meta { total }),
    )))
}

/// Notify users in-app and optionally by email
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    request_body = SendNotificationDto,
    responses(
        (status = 200, description = "Delivery report", body = ApiResponse<DispatchReport>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Recipient not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_notification(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<NotificationService>>,
    AppJson(dto): AppJson<SendNotificationDto>,
) -> Result<Json<ApiResponse<DispatchReport>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.admin_send(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete any notification
#[utoipa::path(
    delete,
    path = "/api/admin/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 404, description = "Notification not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_notification(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.admin_delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Notification deleted".to_string()),
        None,
    )))
}

/// Delete notifications by id
#[utoipa::path(
    delete,
    path = "/api/admin/notifications/bulk",
    request_body = BulkDeleteNotificationsDto,
    responses(
        (status = 200, description = "Notifications deleted", body = ApiResponse<DeletedCountDto>),
        (status = 400, description = "No ids given")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_notifications_bulk(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<NotificationService>>,
    AppJson(dto): AppJson<BulkDeleteNotificationsDto>,
) -> Result<Json<ApiResponse<DeletedCountDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let deleted_count = service.admin_delete_many(&user, &dto.ids).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedCountDto { deleted_count }),
        None,
        None,
    )))
}

/// Delete every notification addressed to a user
#[utoipa::path(
    delete,
    path = "/api/admin/notifications/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Recipient user ID")
    ),
    responses(
        (status = 200, description = "Notifications cleared", body = ApiResponse<DeletedCountDto>)
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_user_notifications(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<NotificationService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedCountDto>>> {
    let deleted_count = service.admin_clear_for_user(&user, user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedCountDto { deleted_count }),
        None,
        None,
    )))
}
