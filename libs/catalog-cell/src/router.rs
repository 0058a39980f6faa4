// libs/catalog-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_services))
        .route("/", post(handlers::create_service))
        .route("/{service_id}", get(handlers::get_service))
        .route("/{service_id}", patch(handlers::update_service))
        .with_state(state)
}
