use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{
    dtos as admin_dtos,
    handlers::{
        dashboard_handlers, item_handlers as admin_item_handlers,
        match_handlers as admin_match_handlers,
        notification_handlers as admin_notification_handlers, setting_handlers, user_handlers,
    },
};
use crate::features::audit::{dtos as audit_dtos, models as audit_models};
use crate::features::items::{dtos as items_dtos, handlers as items_handlers, models as items_models};
use crate::features::matches::{
    dtos as matches_dtos, handlers as matches_handlers, models as matches_models,
};
use crate::features::notifications::{dtos as notifications_dtos, handlers as notifications_handlers};
use crate::features::settings::{dtos as settings_dtos, models as settings_models};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::get_profile,
        users_handlers::update_profile,
        // Items
        items_handlers::browse_items,
        items_handlers::get_item,
        items_handlers::create_item,
        items_handlers::list_my_items,
        items_handlers::update_item,
        items_handlers::resolve_item,
        // Matches
        matches_handlers::create_match,
        matches_handlers::list_my_matches,
        matches_handlers::get_match,
        matches_handlers::append_match_message,
        // Notifications
        notifications_handlers::list_notifications,
        notifications_handlers::mark_notification_read,
        notifications_handlers::mark_all_notifications_read,
        notifications_handlers::delete_notification,
        notifications_handlers::delete_notifications_bulk,
        notifications_handlers::clear_all_notifications,
        // Admin
        admin_item_handlers::list_items,
        admin_item_handlers::get_item,
        admin_item_handlers::set_item_status,
        admin_item_handlers::moderate_item,
        admin_item_handlers::delete_item,
        admin_match_handlers::list_matches,
        admin_match_handlers::get_match,
        admin_match_handlers::create_match,
        admin_match_handlers::update_match_status,
        admin_match_handlers::send_match_email,
        user_handlers::list_users,
        user_handlers::set_user_role,
        user_handlers::set_user_suspended,
        user_handlers::delete_user,
        admin_notification_handlers::list_notifications,
        admin_notification_handlers::send_notification,
        admin_notification_handlers::delete_notification,
        admin_notification_handlers::delete_notifications_bulk,
        admin_notification_handlers::clear_user_notifications,
        setting_handlers::get_settings,
        setting_handlers::update_settings,
        dashboard_handlers::get_stats,
        dashboard_handlers::get_trends,
        dashboard_handlers::list_audit_logs,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Users
            users_models::UserRole,
            users_models::UserSummary,
            users_dtos::UserProfileDto,
            users_dtos::UpdateProfileDto,
            users_dtos::SetUserRoleDto,
            users_dtos::SetUserSuspendedDto,
            ApiResponse<users_dtos::UserProfileDto>,
            ApiResponse<Vec<users_dtos::UserProfileDto>>,
            // Items
            items_models::ItemKind,
            items_models::ModerationStatus,
            items_dtos::CreateItemDto,
            items_dtos::UpdateItemDto,
            items_dtos::ItemStatusFilter,
            items_dtos::ModerateItemDto,
            items_dtos::SetItemResolvedDto,
            items_dtos::ItemResponseDto,
            items_dtos::AdminItemResponseDto,
            ApiResponse<items_dtos::ItemResponseDto>,
            ApiResponse<Vec<items_dtos::ItemResponseDto>>,
            ApiResponse<items_dtos::AdminItemResponseDto>,
            ApiResponse<Vec<items_dtos::AdminItemResponseDto>>,
            // Matches
            matches_models::MatchStatus,
            matches_models::MatchMessage,
            matches_dtos::CreateMatchDto,
            matches_dtos::UpdateMatchStatusDto,
            matches_dtos::AppendMessageDto,
            matches_dtos::SendMatchEmailDto,
            matches_dtos::MatchItemDto,
            matches_dtos::MatchResponseDto,
            ApiResponse<matches_dtos::MatchResponseDto>,
            ApiResponse<Vec<matches_dtos::MatchResponseDto>>,
            // Notifications
            notifications_dtos::NotificationResponseDto,
            notifications_dtos::AdminNotificationResponseDto,
            notifications_dtos::BulkDeleteNotificationsDto,
            notifications_dtos::SendNotificationDto,
            notifications_dtos::EmailDeliveryResult,
            notifications_dtos::DispatchReport,
            notifications_dtos::DeletedCountDto,
            notifications_dtos::ModifiedCountDto,
            ApiResponse<Vec<notifications_dtos::NotificationResponseDto>>,
            ApiResponse<Vec<notifications_dtos::AdminNotificationResponseDto>>,
            ApiResponse<notifications_dtos::DispatchReport>,
            ApiResponse<notifications_dtos::DeletedCountDto>,
            ApiResponse<notifications_dtos::ModifiedCountDto>,
            // Settings
            settings_models::Setting,
            settings_dtos::SettingEntryDto,
            settings_dtos::UpdateSettingsDto,
            settings_dtos::SettingsDto,
            ApiResponse<settings_dtos::SettingsDto>,
            // Audit
            audit_models::AuditEntityType,
            audit_dtos::AuditLogResponseDto,
            ApiResponse<Vec<audit_dtos::AuditLogResponseDto>>,
            // Admin dashboard
            items_models::TrendPeriod,
            items_models::KindBucketCount,
            items_models::ResolutionBucket,
            items_models::CategoryCount,
            items_models::ItemTrends,
            admin_dtos::ItemStatsDto,
            admin_dtos::MatchStatsDto,
            admin_dtos::UserStatsDto,
            admin_dtos::DashboardStatsDto,
            ApiResponse<admin_dtos::DashboardStatsDto>,
            ApiResponse<items_models::ItemTrends>,
        )
    ),
    tags(
        (name = "users", description = "Caller profile"),
        (name = "items", description = "Lost and found reports"),
        (name = "matches", description = "Proposed pairings of a lost and a found item"),
        (name = "notifications", description = "In-app notification inbox"),
        (name = "admin", description = "Admin endpoints (admin role only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Lost & Found API",
        version = "0.1.0",
        description = "API documentation for the Lost & Found registry",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
