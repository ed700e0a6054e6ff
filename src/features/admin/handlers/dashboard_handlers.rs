use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::admin::dtos::{DashboardStatsDto, TrendsQuery};
use crate::features::admin::services::AdminService;
use crate::features::audit::dtos::AuditLogResponseDto;
use crate::features::audit::AuditRecorder;
use crate::features::auth::guards::RequireAdmin;
use crate::features::items::models::ItemTrends;
use crate::shared::types::{ApiResponse, Meta, Paginate, PaginationQuery};

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Item, match and user counters", body = ApiResponse<DashboardStatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_stats(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>> {
    let stats = service.stats(&user).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Item analytics bucketed by week or month
#[utoipa::path(
    get,
    path = "/api/admin/analytics/trends",
    params(TrendsQuery),
    responses(
        (status = 200, description = "Trend buckets, newest first", body = ApiResponse<ItemTrends>),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_trends(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<ApiResponse<ItemTrends>>> {
    let trends = service.trends(&user, &query).await?;
    Ok(Json(ApiResponse::success(Some(trends), None, None)))
}

/// Audit trail, newest first
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Audit entries with actors", body = ApiResponse<Vec<AuditLogResponseDto>>),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_audit_logs(
    RequireAdmin(_user): RequireAdmin,
    State(audit): State<Arc<AuditRecorder>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<AuditLogResponseDto>>>> {
    let (entries, total) = audit.list(params.offset(), params.limit()).await?;
    Ok(Json(ApiResponse::success(
        Some(entries),
        None,
        Some(Meta { total }),
    )))
}
