use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use barber_cell::router::barber_routes;
use catalog_cell::router::catalog_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Chairtime booking API is running!" }))
        .nest("/api/barbers", barber_routes(state.clone()))
        .nest("/api/services", catalog_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state))
}
