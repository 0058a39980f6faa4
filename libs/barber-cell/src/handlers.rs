// libs/barber-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use catalog_cell::models::CatalogError;
use catalog_cell::services::catalog::CatalogService;
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AvailabilityError, WorkSchedule};
use crate::services::availability::AvailabilityService;
use crate::services::schedule::ScheduleService;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub service_id: Uuid,
}

#[axum::debug_handler]
pub async fn get_barber(
    State(state): State<Arc<AppConfig>>,
    Path(barber_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let barber = schedule_service
        .get_barber(barber_id)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "barber": barber
    })))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(barber_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let schedule = schedule_service
        .get_schedule(barber_id)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "schedule": schedule
    })))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(barber_id): Path<Uuid>,
    Json(request): Json<WorkSchedule>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let schedule = schedule_service
        .update_schedule(barber_id, request)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "success": true,
        "schedule": schedule
    })))
}

/// Free/busy slots for one barber, date and service.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
    Path(barber_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let catalog_service = CatalogService::new(&state);
    let availability_service = AvailabilityService::new(&state);

    let service = catalog_service
        .get_service(query.service_id)
        .await
        .map_err(|e| match e {
            CatalogError::NotFound => AppError::NotFound("service not found".to_string()),
            _ => AppError::StoreUnavailable(e.to_string()),
        })?;

    let slots = availability_service
        .get_available_slots(barber_id, query.date, &service)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "barber_id": barber_id,
        "date": query.date,
        "service_id": service.id,
        "slots": slots
    })))
}

fn map_availability_error(err: AvailabilityError) -> AppError {
    match err {
        AvailabilityError::BarberNotFound(_) | AvailabilityError::ScheduleNotFound(_) => {
            AppError::NotFound(err.to_string())
        }
        AvailabilityError::InvalidSchedule(_) => AppError::BadRequest(err.to_string()),
        AvailabilityError::StoreUnavailable(_) => AppError::StoreUnavailable(err.to_string()),
    }
}
