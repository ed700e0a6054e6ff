use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::matches::dtos::{AppendMessageDto, CreateMatchDto, MatchResponseDto};
use crate::features::matches::services::MatchService;
use crate::shared::types::ApiResponse;

/// Propose a match between two items
///
/// Idempotent on the unordered pair. Returns 201 with the new match, or 200
/// with the existing one when the pair was already matched.
#[utoipa::path(
    post,
    path = "/api/matches",
    request_body = CreateMatchDto,
    responses(
        (status = 201, description = "Match created", body = ApiResponse<MatchResponseDto>),
        (status = 200, description = "Match already existed", body = ApiResponse<MatchResponseDto>),
        (status = 400, description = "Items must be different"),
        (status = 404, description = "Item not found")
    ),
    tag = "matches",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_match(
    user: AuthenticatedUser,
    State(service): State<Arc<MatchService>>,
    AppJson(dto): AppJson<CreateMatchDto>,
) -> Result<(StatusCode, Json<ApiResponse<MatchResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (found, created) = service.create(&user, dto).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::success(Some(found), None, None))))
}

/// List matches involving the caller's items
#[utoipa::path(
    get,
    path = "/api/matches/mine",
    responses(
        (status = 200, description = "Matches, newest first", body = ApiResponse<Vec<MatchResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "matches",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_matches(
    user: AuthenticatedUser,
    State(service): State<Arc<MatchService>>,
) -> Result<Json<ApiResponse<Vec<MatchResponseDto>>>> {
    let matches = service.list_for_user(&user).await?;
    Ok(Json(ApiResponse::success(Some(matches), None, None)))
}

/// Get a match the caller is party to
#[utoipa::path(
    get,
    path = "/api/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    responses(
        (status = 200, description = "Match found", body = ApiResponse<MatchResponseDto>),
        (status = 404, description = "Match not found")
    ),
    tag = "matches",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_match(
    user: AuthenticatedUser,
    State(service): State<Arc<MatchService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MatchResponseDto>>> {
    let found = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(found), None, None)))
}

/// Add a message to a match's conversation
#[utoipa::path(
    post,
    path = "/api/matches/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    request_body = AppendMessageDto,
    responses(
        (status = 201, description = "Message added", body = ApiResponse<MatchResponseDto>),
        (status = 400, description = "Empty or oversized message"),
        (status = 404, description = "Match not found")
    ),
    tag = "matches",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn append_match_message(
    user: AuthenticatedUser,
    State(service): State<Arc<MatchService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AppendMessageDto>,
) -> Result<(StatusCode, Json<ApiResponse<MatchResponseDto>>)> {
    let found = service.append_message(&user, id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(found), None, None)),
    ))
}
