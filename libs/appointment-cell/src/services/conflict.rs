// libs/appointment-cell/src/services/conflict.rs
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, BookingError};

/// Read-side conflict detection: which appointments still hold a slot that
/// overlaps a requested interval. The atomic arbiter for writes is the
/// store's exclusion constraint; this service exists for precise answers on
/// the read path.
pub struct ConflictDetectionService {
    supabase: SupabaseClient,
}

impl ConflictDetectionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Appointments for the barber whose interval overlaps
    /// `[starts_at, ends_at)` and whose status still blocks it.
    pub async fn find_conflicts(
        &self,
        barber_id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, BookingError> {
        debug!("Checking conflicts for barber {} from {} to {}", barber_id, starts_at, ends_at);

        let mut query_parts = vec![
            format!("barber_id=eq.{}", barber_id),
            "status=in.(pending,confirmed)".to_string(),
            format!("starts_at=lt.{}", urlencoding::encode(&ends_at.to_rfc3339())),
            format!("ends_at=gt.{}", urlencoding::encode(&starts_at.to_rfc3339())),
        ];

        if let Some(exclude_id) = exclude_appointment_id {
            query_parts.push(format!("id=neq.{}", exclude_id));
        }

        let path = format!("/rest/v1/appointments?{}&order=starts_at.asc", query_parts.join("&"));

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::StoreUnavailable(e.to_string()))?;

        let appointments: Vec<Appointment> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| BookingError::StoreUnavailable(format!("failed to parse appointment rows: {}", e)))?;

        let conflicting: Vec<Appointment> = appointments
            .into_iter()
            .filter(|appointment| {
                appointment.status.is_blocking()
                    && intervals_overlap(starts_at, ends_at, appointment.starts_at, appointment.ends_at)
            })
            .collect();

        if !conflicting.is_empty() {
            warn!(
                "Conflict detected for barber {} - {} overlapping appointments",
                barber_id,
                conflicting.len()
            );
        }

        Ok(conflicting)
    }
}

/// Half-open interval overlap: `[start1, end1)` and `[start2, end2)`
/// intersect iff start1 < end2 and start2 < end1.
pub fn intervals_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}
