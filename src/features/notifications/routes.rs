use std::sync::Arc;

use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::features::notifications::handlers;
use crate::features::notifications::services::NotificationService;

pub fn routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/mark-all-read",
            patch(handlers::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/bulk",
            delete(handlers::delete_notifications_bulk),
        )
        .route(
            "/api/notifications/clear-all",
            delete(handlers::clear_all_notifications),
        )
        .route(
            "/api/notifications/{id}",
            delete(handlers::delete_notification),
        )
        .route(
            "/api/notifications/{id}/read",
            patch(handlers::mark_notification_read),
        )
        .with_state(service)
}
