// libs/appointment-cell/src/services/booking.rs
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use barber_cell::models::AvailabilityError;
use barber_cell::services::availability::AvailabilityService;
use catalog_cell::models::{CatalogError, ServiceOffering};
use catalog_cell::services::catalog::CatalogService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentStatus, BookAppointmentRequest, BookingError, CustomerRef};
use crate::services::lifecycle::AppointmentLifecycleService;

/// The booking transaction: validates a requested slot against the barber's
/// real availability, then reserves it with a single conditional insert.
///
/// The insert is the atomic step. The appointments table carries a range
/// exclusion constraint over `(barber_id, tstzrange(starts_at, ends_at))`
/// for pending/confirmed rows, so of two concurrent requests for the same
/// interval exactly one insert succeeds; the loser surfaces as a conflict.
pub struct BookingService {
    supabase: SupabaseClient,
    lifecycle_service: AppointmentLifecycleService,
    availability_service: AvailabilityService,
    catalog_service: CatalogService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            lifecycle_service: AppointmentLifecycleService::new(),
            availability_service: AvailabilityService::new(config),
            catalog_service: CatalogService::new(config),
        }
    }

    /// Book a slot. `now` is the caller's clock; the engine never reads one.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Appointment, BookingError> {
        debug!("Booking request for barber {} at {}", request.barber_id, request.starts_at);

        request.customer.validate()?;

        let service = self.resolve_service(request.service_id).await?;

        if request.starts_at <= now {
            return Err(BookingError::Validation {
                field: "starts_at",
                reason: "appointment must start in the future".to_string(),
            });
        }

        // Re-derive the bookable slots instead of trusting the client's idea
        // of feasibility.
        let date = request.starts_at.date_naive();
        let start_time = request.starts_at.time();
        let ends_at = request.starts_at + Duration::minutes(i64::from(service.duration_minutes));

        let slots = self
            .availability_service
            .get_available_slots(request.barber_id, date, &service)
            .await
            .map_err(map_availability_error)?;

        let Some(slot) = slots.iter().find(|slot| slot.start_time == start_time) else {
            return Err(BookingError::Validation {
                field: "starts_at",
                reason: format!("{} is not a bookable slot on {}", start_time, date),
            });
        };

        if !slot.is_available {
            return Err(BookingError::Conflict {
                starts_at: request.starts_at,
                ends_at,
            });
        }

        self.insert_appointment(&request, ends_at, now).await
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        debug!("Fetching appointment: {}", appointment_id);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(BookingError::NotFound {
                resource: "appointment",
                id: appointment_id,
            });
        };

        parse_appointment(row)
    }

    /// Move an appointment through its state machine. Illegal transitions
    /// are rejected before the store is touched.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> Result<Appointment, BookingError> {
        debug!("Updating appointment {} to status {}", appointment_id, new_status);

        let current = self.get_appointment(appointment_id).await?;

        self.lifecycle_service
            .validate_status_transition(&current.status, &new_status)?;

        let update_data = json!({
            "status": new_status.to_string(),
            "updated_at": now.to_rfc3339(),
        });

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(update_data), Some(headers))
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(BookingError::NotFound {
                resource: "appointment",
                id: appointment_id,
            });
        };

        let updated = parse_appointment(row)?;
        info!("Appointment {} moved from {} to {}", appointment_id, current.status, updated.status);
        Ok(updated)
    }

    /// A barber's appointments from `from` onwards, ascending.
    pub async fn list_for_barber(
        &self,
        barber_id: Uuid,
        from: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, BookingError> {
        debug!("Listing appointments for barber {} from {}", barber_id, from);

        let path = format!(
            "/rest/v1/appointments?barber_id=eq.{}&starts_at=gte.{}&order=starts_at.asc",
            barber_id,
            urlencoding::encode(&from.to_rfc3339()),
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        result.into_iter().map(parse_appointment).collect()
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn resolve_service(&self, service_id: Uuid) -> Result<ServiceOffering, BookingError> {
        let service = self
            .catalog_service
            .get_service(service_id)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound => BookingError::NotFound {
                    resource: "service",
                    id: service_id,
                },
                _ => BookingError::StoreUnavailable(e.to_string()),
            })?;

        if !service.is_active {
            return Err(BookingError::Validation {
                field: "service_id",
                reason: format!("service {} is not bookable", service.name),
            });
        }

        Ok(service)
    }

    /// The atomic reserve step. A 409 from the store means the exclusion
    /// constraint (or the idempotency index) rejected the row because a
    /// concurrent booking got there first.
    async fn insert_appointment(
        &self,
        request: &BookAppointmentRequest,
        ends_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Appointment, BookingError> {
        let appointment_id = Uuid::new_v4();
        let status = request.channel.initial_status();

        let (customer_id, customer_name, customer_phone) = match &request.customer {
            CustomerRef::Registered { customer_id } => (Some(*customer_id), None, None),
            CustomerRef::Guest { name, phone } => (None, Some(name.clone()), Some(phone.clone())),
        };

        let appointment_data = json!({
            "id": appointment_id,
            "barber_id": request.barber_id,
            "service_id": request.service_id,
            "customer_id": customer_id,
            "customer_name": customer_name,
            "customer_phone": customer_phone,
            "starts_at": request.starts_at.to_rfc3339(),
            "ends_at": ends_at.to_rfc3339(),
            "status": status.to_string(),
            "idempotency_key": request.idempotency_key,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339(),
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = match self
            .supabase
            .request_with_headers(Method::POST, "/rest/v1/appointments", Some(appointment_data), Some(headers))
            .await
        {
            Ok(rows) => rows,
            Err(e) if e.is_conflict() => {
                warn!(
                    "Insert rejected for barber {} at {}: slot taken by a concurrent booking",
                    request.barber_id, request.starts_at
                );
                return Err(BookingError::Conflict {
                    starts_at: request.starts_at,
                    ends_at,
                });
            }
            Err(e) => return Err(BookingError::StoreUnavailable(e.to_string())),
        };

        let Some(row) = result.into_iter().next() else {
            return Err(BookingError::StoreUnavailable("appointment insert returned no row".to_string()));
        };

        let appointment = parse_appointment(row)?;
        info!(
            "Appointment {} booked for barber {} at {} ({})",
            appointment.id, appointment.barber_id, appointment.starts_at, appointment.status
        );
        Ok(appointment)
    }
}

fn parse_appointment(row: Value) -> Result<Appointment, BookingError> {
    serde_json::from_value(row)
        .map_err(|e| BookingError::StoreUnavailable(format!("failed to parse appointment row: {}", e)))
}

fn map_availability_error(err: AvailabilityError) -> BookingError {
    match err {
        AvailabilityError::BarberNotFound(id) | AvailabilityError::ScheduleNotFound(id) => {
            BookingError::NotFound { resource: "barber schedule", id }
        }
        AvailabilityError::InvalidSchedule(e) => BookingError::Validation {
            field: "schedule",
            reason: e.to_string(),
        },
        AvailabilityError::StoreUnavailable(detail) => BookingError::StoreUnavailable(detail),
    }
}
