// libs/barber-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn barber_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{barber_id}", get(handlers::get_barber))
        .route("/{barber_id}/schedule", get(handlers::get_schedule))
        .route("/{barber_id}/schedule", put(handlers::update_schedule))
        .route("/{barber_id}/availability", get(handlers::get_availability))
        .with_state(state)
}
