// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, BookingError, UpdateStatusRequest};
use crate::services::booking::BookingService;
use crate::services::conflict::ConflictDetectionService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct BarberAppointmentsQuery {
    pub from: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ConflictCheckQuery {
    pub barber_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub exclude_appointment_id: Option<Uuid>,
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .book(request, Utc::now())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .update_status(appointment_id, request.status, Utc::now())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn get_barber_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(barber_id): Path<Uuid>,
    Query(query): Query<BarberAppointmentsQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let from = query.from.unwrap_or_else(Utc::now);
    let appointments = booking_service
        .list_for_barber(barber_id, from)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "barber_id": barber_id,
        "from": from,
        "appointments": appointments
    })))
}

/// Read-side probe used by booking wizards before the real reserve attempt.
#[axum::debug_handler]
pub async fn check_appointment_conflicts(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ConflictCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let conflict_service = ConflictDetectionService::new(&state);

    let conflicting = conflict_service
        .find_conflicts(
            query.barber_id,
            query.starts_at,
            query.ends_at,
            query.exclude_appointment_id,
        )
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "has_conflict": !conflicting.is_empty(),
        "conflicting_appointments": conflicting
    })))
}

fn map_booking_error(err: BookingError) -> AppError {
    match err {
        BookingError::Validation { .. } => AppError::BadRequest(err.to_string()),
        BookingError::Conflict { .. } => AppError::Conflict(err.to_string()),
        BookingError::NotFound { .. } => AppError::NotFound(err.to_string()),
        BookingError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
        BookingError::StoreUnavailable(_) => AppError::StoreUnavailable(err.to_string()),
    }
}
