use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::users::handlers::profile_handler;
use crate::features::users::services::UserService;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users/me",
            get(profile_handler::get_profile).put(profile_handler::update_profile),
        )
        .with_state(service)
}
