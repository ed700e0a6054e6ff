use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};

use crate::core::database::Database;
use crate::core::middleware::{self, AuthState};
use crate::features::admin::{routes as admin_routes, AdminService, AdminServices};
use crate::features::audit::AuditRecorder;
use crate::features::auth::JwtValidator;
use crate::features::items::{routes as items_routes, ItemService};
use crate::features::matches::{routes as matches_routes, MatchService};
use crate::features::notifications::{
    routes as notifications_routes, NotificationDispatcher, NotificationService,
};
use crate::features::settings::SettingService;
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::email::EmailTransport;

/// Every service the HTTP surface needs, wired over one database
pub struct AppContext {
    pub db: Database,
    pub validator: Arc<JwtValidator>,
    pub audit: Arc<AuditRecorder>,
    pub items: Arc<ItemService>,
    pub matches: Arc<MatchService>,
    pub notifications: Arc<NotificationService>,
    pub settings: Arc<SettingService>,
    pub users: Arc<UserService>,
    pub admin: Arc<AdminService>,
}

impl AppContext {
    pub fn new(
        db: Database,
        validator: JwtValidator,
        mailer: Option<Arc<dyn EmailTransport>>,
        send_timeout: Duration,
        app_url: &str,
    ) -> Self {
        let audit = Arc::new(AuditRecorder::new(db.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            db.clone(),
            mailer,
            send_timeout,
            app_url.to_string(),
        ));

        Self {
            validator: Arc::new(validator),
            items: Arc::new(ItemService::new(db.clone(), Arc::clone(&audit))),
            matches: Arc::new(MatchService::new(
                db.clone(),
                Arc::clone(&dispatcher),
                Arc::clone(&audit),
            )),
            notifications: Arc::new(NotificationService::new(
                db.clone(),
                Arc::clone(&dispatcher),
                Arc::clone(&audit),
            )),
            settings: Arc::new(SettingService::new(db.clone(), Arc::clone(&audit))),
            users: Arc::new(UserService::new(db.clone(), Arc::clone(&audit))),
            admin: Arc::new(AdminService::new(db.clone())),
            audit,
            db,
        }
    }

    pub fn admin_services(&self) -> AdminServices {
        AdminServices {
            admin: Arc::clone(&self.admin),
            audit: Arc::clone(&self.audit),
            items: Arc::clone(&self.items),
            matches: Arc::clone(&self.matches),
            notifications: Arc::clone(&self.notifications),
            settings: Arc::clone(&self.settings),
            users: Arc::clone(&self.users),
        }
    }

    /// API routes without the outer layers (CORS, tracing, request ids)
    pub fn routes(&self) -> Router {
        let auth_state = AuthState {
            validator: Arc::clone(&self.validator),
            db: self.db.clone(),
        };

        let protected_routes = Router::new()
            .merge(users_routes::routes(Arc::clone(&self.users)))
            .merge(items_routes::routes(Arc::clone(&self.items)))
            .merge(matches_routes::routes(Arc::clone(&self.matches)))
            .merge(notifications_routes::routes(Arc::clone(&self.notifications)))
            .nest("/api/admin", admin_routes::routes(self.admin_services()))
            .route_layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ));

        async fn health_check() -> StatusCode {
            StatusCode::OK
        }

        let public_routes = Router::new()
            .route("/health", get(health_check))
            .merge(items_routes::public_routes(Arc::clone(&self.items)));

        Router::new().merge(protected_routes).merge(public_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::items::models::ItemKind;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{issue_token, seed_item, seed_user, test_context};

    fn server(ctx: &AppContext) -> TestServer {
        TestServer::new(ctx.routes()).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_public_browse_need_no_token() {
        let ctx = test_context();
        let owner = seed_user(&ctx.db, UserRole::User).await;
        seed_item(&ctx.db, &owner, ItemKind::Lost, "Blue scarf").await;
        let server = server(&ctx);

        server.get("/health").await.assert_status_ok();

        let response = server.get("/api/items").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["name"], "Blue scarf");
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_known_user() {
        let ctx = test_context();
        let server = server(&ctx);

        server
            .get("/api/users/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/api/users/me")
            .authorization_bearer("not-a-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        // Valid signature, but nobody with that id
        server
            .get("/api/users/me")
            .authorization_bearer(issue_token(uuid::Uuid::now_v7()))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_reflects_stored_user() {
        let ctx = test_context();
        let user = seed_user(&ctx.db, UserRole::Business).await;

        let response = server(&ctx)
            .get("/api/users/me")
            .authorization_bearer(issue_token(user.id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["email"], user.email);
        assert_eq!(body["data"]["role"], "business");
    }

    #[tokio::test]
    async fn test_admin_routes_forbid_regular_users() {
        let ctx = test_context();
        let user = seed_user(&ctx.db, UserRole::User).await;
        let admin = seed_user(&ctx.db, UserRole::Admin).await;
        let server = server(&ctx);

        server
            .get("/api/admin/stats")
            .authorization_bearer(issue_token(user.id))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let response = server
            .get("/api/admin/stats")
            .authorization_bearer(issue_token(admin.id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["users"]["total"], 2);
    }

    #[tokio::test]
    async fn test_report_then_match_over_http() {
        let ctx = test_context();
        let loser = seed_user(&ctx.db, UserRole::User).await;
        let finder = seed_user(&ctx.db, UserRole::User).await;
        let server = server(&ctx);

        let created = server
            .post("/api/items")
            .authorization_bearer(issue_token(loser.id))
            .json(&json!({
                "type": "lost",
                "name": "Silver watch",
                "location": "Platform 4",
                "date": "2025-06-01"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let lost_id = created.json::<Value>()["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let found = seed_item(&ctx.db, &finder, ItemKind::Found, "Silver watch").await;
        let body = json!({ "itemAId": lost_id, "itemBId": found.id });

        let first = server
            .post("/api/matches")
            .authorization_bearer(issue_token(finder.id))
            .json(&body)
            .await;
        first.assert_status(StatusCode::CREATED);

        let second = server
            .post("/api/matches")
            .authorization_bearer(issue_token(loser.id))
            .json(&body)
            .await;
        second.assert_status_ok();
        assert_eq!(
            first.json::<Value>()["data"]["id"],
            second.json::<Value>()["data"]["id"]
        );

        let inbox = server
            .get("/api/notifications")
            .authorization_bearer(issue_token(loser.id))
            .await;
        inbox.assert_status_ok();
        let notifications = inbox.json::<Value>();
        assert_eq!(notifications["data"].as_array().unwrap().len(), 1);
        assert_eq!(notifications["data"][0]["type"], "match");
    }

    #[tokio::test]
    async fn test_unknown_item_type_is_a_validation_error() {
        let ctx = test_context();
        let user = seed_user(&ctx.db, UserRole::User).await;

        let response = server(&ctx)
            .post("/api/items")
            .authorization_bearer(issue_token(user.id))
            .json(&json!({
                "type": "other",
                "name": "Umbrella",
                "location": "Library",
                "date": "2025-06-01"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("other"));
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
        assert_eq!(ctx.db.count_items(&Default::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_admin_settings_round_trip() {
        let ctx = test_context();
        let admin = seed_user(&ctx.db, UserRole::Admin).await;
        let server = server(&ctx);
        let token = issue_token(admin.id);

        server
            .put("/api/admin/settings")
            .authorization_bearer(token.clone())
            .json(&json!({ "settings": [{ "key": "siteName", "value": "Campus L&F" }] }))
            .await
            .assert_status_ok();

        let response = server
            .get("/api/admin/settings")
            .authorization_bearer(token)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["settings"][0]["key"], "siteName");
        assert_eq!(body["data"]["settings"][0]["value"], "Campus L&F");
    }
}
