// libs/catalog-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CatalogError, CreateServiceRequest, UpdateServiceRequest};
use crate::services::catalog::CatalogService;

#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    pub active: Option<bool>,
}

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<Value>, AppError> {
    let catalog_service = CatalogService::new(&state);

    let services = catalog_service
        .list_services(query.active.unwrap_or(false))
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({
        "services": services
    })))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let catalog_service = CatalogService::new(&state);

    let service = catalog_service
        .get_service(service_id)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({
        "service": service
    })))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let catalog_service = CatalogService::new(&state);

    let service = catalog_service
        .create_service(request)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({
        "success": true,
        "service": service
    })))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<Uuid>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let catalog_service = CatalogService::new(&state);

    let service = catalog_service
        .update_service(service_id, request)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({
        "success": true,
        "service": service
    })))
}

fn map_catalog_error(err: CatalogError) -> AppError {
    match err {
        CatalogError::NotFound => AppError::NotFound("service not found".to_string()),
        CatalogError::Validation { .. } => AppError::BadRequest(err.to_string()),
        CatalogError::StoreUnavailable(_) => AppError::StoreUnavailable(err.to_string()),
    }
}
