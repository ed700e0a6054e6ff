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
use crate::features::auth::guards::RequireAdmin;
use crate::features::matches::dtos::{
    AdminMatchQueryParams, CreateMatchDto, MatchResponseDto, SendMatchEmailDto,
    UpdateMatchStatusDto,
};
use crate::features::matches::services::MatchService;
use crate::features::notifications::dtos::DispatchReport;
use crate::shared::types::{ApiResponse, Meta};

/// List all matches (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/matches",
    params(AdminMatchQueryParams),
    responses(
        (status = 200, description = "Matches, newest first", body = ApiResponse<Vec<MatchResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_matches(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<MatchService>>,
    Query(params): Query<AdminMatchQueryParams>,
) -> Result<Json<ApiResponse<Vec<MatchResponseDto>>>> {
    let (matches, total) = service.list_all(&user, &params).await?;
    Ok(Json(ApiResponse::success(
        Some(matches),
        None,
        Some(Meta { total }),
    )))
}

/// Get any match with its items and people
#[utoipa::path(
    get,
    path = "/api/admin/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    responses(
        (status = 200, description = "Match found", body = ApiResponse<MatchResponseDto>),
        (status = 404, description = "Match not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_match(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<MatchService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MatchResponseDto>>> {
    let found = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(found), None, None)))
}

/// Create a match between two items
///
/// Same pair semantics as `POST /api/matches`: 201 when created, 200 with the
/// existing match otherwise.
#[utoipa::path(
    post,
    path = "/api/admin/matches",
    request_body = CreateMatchDto,
    responses(
        (status = 201, description = "Match created", body = ApiResponse<MatchResponseDto>),
        (status = 200, description = "Match already existed", body = ApiResponse<MatchResponseDto>),
        (status = 400, description = "Items must be different"),
        (status = 404, description = "Item not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_match(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<MatchService>>,
    AppJson(dto): AppJson<CreateMatchDto>,
) -> Result<(StatusCode, Json<ApiResponse<MatchResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (found, created) = service.admin_create(&user, dto).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::success(Some(found), None, None))))
}

/// Move a match to its next status
#[utoipa::path(
    patch,
    path = "/api/admin/matches/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    request_body = UpdateMatchStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<MatchResponseDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Status changed concurrently")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_match_status(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<MatchService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateMatchStatusDto>,
) -> Result<Json<ApiResponse<MatchResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let found = service.update_status(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(found), None, None)))
}

/// Email and notify both owners of a match
#[utoipa::path(
    post,
    path = "/api/admin/matches/{id}/send-email",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    request_body = SendMatchEmailDto,
    responses(
        (status = 200, description = "Per-recipient delivery report", body = ApiResponse<DispatchReport>),
        (status = 404, description = "Match not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_match_email(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<MatchService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SendMatchEmailDto>,
) -> Result<Json<ApiResponse<DispatchReport>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.send_email(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}
