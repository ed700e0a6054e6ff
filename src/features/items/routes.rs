use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::items::handlers;
use crate::features::items::services::ItemService;

/// Public item routes (no authentication)
pub fn public_routes(service: Arc<ItemService>) -> Router {
    Router::new()
        .route("/api/items", get(handlers::browse_items))
        .route("/api/items/{id}", get(handlers::get_item))
        .with_state(service)
}

/// Item routes for authenticated users
pub fn routes(service: Arc<ItemService>) -> Router {
    Router::new()
        .route("/api/items", post(handlers::create_item))
        .route("/api/items/mine", get(handlers::list_my_items))
        .route("/api/items/{id}", put(handlers::update_item))
        .route("/api/items/{id}/resolve", post(handlers::resolve_item))
        .with_state(service)
}
