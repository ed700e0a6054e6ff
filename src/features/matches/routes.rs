use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::matches::handlers;
use crate::features::matches::services::MatchService;

pub fn routes(service: Arc<MatchService>) -> Router {
    Router::new()
        .route("/api/matches", post(handlers::create_match))
        .route("/api/matches/mine", get(handlers::list_my_matches))
        .route("/api/matches/{id}", get(handlers::get_match))
        .route(
            "/api/matches/{id}/messages",
            post(handlers::append_match_message),
        )
        .with_state(service)
}
