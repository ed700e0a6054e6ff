use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::features::admin::handlers::{
    dashboard_handlers, item_handlers, match_handlers, notification_handlers, setting_handlers,
    user_handlers,
};
use crate::features::admin::services::AdminService;
use crate::features::audit::AuditRecorder;
use crate::features::items::ItemService;
use crate::features::matches::MatchService;
use crate::features::notifications::NotificationService;
use crate::features::settings::SettingService;
use crate::features::users::UserService;

/// Services the admin routes act through
#[derive(Clone)]
pub struct AdminServices {
    pub admin: Arc<AdminService>,
    pub audit: Arc<AuditRecorder>,
    pub items: Arc<ItemService>,
    pub matches: Arc<MatchService>,
    pub notifications: Arc<NotificationService>,
    pub settings: Arc<SettingService>,
    pub users: Arc<UserService>,
}

/// Create admin routes (all require the admin role). Nest under `/api/admin`.
pub fn routes(services: AdminServices) -> Router {
    let items = Router::new()
        .route("/items", get(item_handlers::list_items))
        .route(
            "/items/{id}",
            get(item_handlers::get_item).delete(item_handlers::delete_item),
        )
        .route("/items/{id}/status", patch(item_handlers::set_item_status))
        .route("/items/{id}/moderate", patch(item_handlers::moderate_item))
        .with_state(services.items);

    let matches = Router::new()
        .route(
            "/matches",
            get(match_handlers::list_matches).post(match_handlers::create_match),
        )
        .route("/matches/{id}", get(match_handlers::get_match))
        .route(
            "/matches/{id}/status",
            patch(match_handlers::update_match_status),
        )
        .route(
            "/matches/{id}/send-email",
            post(match_handlers::send_match_email),
        )
        .with_state(services.matches);

    let users = Router::new()
        .route("/users", get(user_handlers::list_users))
        .route("/users/{id}", delete(user_handlers::delete_user))
        .route("/users/{id}/role", patch(user_handlers::set_user_role))
        .route(
            "/users/{id}/suspend",
            patch(user_handlers::set_user_suspended),
        )
        .with_state(services.users);

    let notifications = Router::new()
        .route(
            "/notifications",
            get(notification_handlers::list_notifications)
                .post(notification_handlers::send_notification),
        )
        .route(
            "/notifications/bulk",
            delete(notification_handlers::delete_notifications_bulk),
        )
        .route(
            "/notifications/user/{user_id}",
            delete(notification_handlers::clear_user_notifications),
        )
        .route(
            "/notifications/{id}",
            delete(notification_handlers::delete_notification),
        )
        .with_state(services.notifications);

    let settings = Router::new()
        .route(
            "/settings",
            get(setting_handlers::get_settings).put(setting_handlers::update_settings),
        )
        .with_state(services.settings);

    let dashboard = Router::new()
        .route("/stats", get(dashboard_handlers::get_stats))
        .route("/analytics/trends", get(dashboard_handlers::get_trends))
        .with_state(services.admin);

    let audit = Router::new()
        .route("/audit-logs", get(dashboard_handlers::list_audit_logs))
        .with_state(services.audit);

    Router::new()
        .merge(items)
        .merge(matches)
        .merge(users)
        .merge(notifications)
        .merge(settings)
        .merge(dashboard)
        .merge(audit)
}
