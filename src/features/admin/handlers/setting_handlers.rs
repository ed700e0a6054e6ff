use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::settings::dtos::{SettingsDto, UpdateSettingsDto};
use crate::features::settings::services::SettingService;
use crate::shared::types::ApiResponse;

/// List all settings, sorted by key
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Settings", body = ApiResponse<SettingsDto>),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_settings(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<SettingService>>,
) -> Result<Json<ApiResponse<SettingsDto>>> {
    let settings = service.list().await?;
    Ok(Json(ApiResponse::success(
        Some(SettingsDto { settings }),
        None,
        None,
    )))
}

/// Create or replace settings
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Settings after the update", body = ApiResponse<SettingsDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_settings(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<SettingService>>,
    AppJson(dto): AppJson<UpdateSettingsDto>,
) -> Result<Json<ApiResponse<SettingsDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let settings = service.upsert(&user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(SettingsDto { settings }),
        Some("Settings updated".to_string()),
        None,
    )))
}
