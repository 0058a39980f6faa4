// libs/barber-cell/src/services/schedule.rs
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AvailabilityError, Barber, WorkSchedule};

/// Read and write access to a barber's profile row, which carries the
/// weekly working-hours template.
pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_barber(&self, barber_id: Uuid) -> Result<Barber, AvailabilityError> {
        debug!("Fetching barber profile: {}", barber_id);

        let path = format!("/rest/v1/barbers?id=eq.{}", barber_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AvailabilityError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(AvailabilityError::BarberNotFound(barber_id));
        };

        serde_json::from_value(row)
            .map_err(|e| AvailabilityError::StoreUnavailable(format!("failed to parse barber row: {}", e)))
    }

    pub async fn get_schedule(&self, barber_id: Uuid) -> Result<WorkSchedule, AvailabilityError> {
        debug!("Fetching schedule for barber: {}", barber_id);

        let path = format!(
            "/rest/v1/barbers?id=eq.{}&select=start_time,end_time,lunch_start,lunch_end,days_off,slot_granularity_minutes",
            barber_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AvailabilityError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(AvailabilityError::ScheduleNotFound(barber_id));
        };

        serde_json::from_value(row)
            .map_err(|e| AvailabilityError::StoreUnavailable(format!("failed to parse schedule row: {}", e)))
    }

    /// Replace the barber's weekly template. The schedule is validated
    /// before the write; an inconsistent one never reaches the store.
    pub async fn update_schedule(
        &self,
        barber_id: Uuid,
        schedule: WorkSchedule,
    ) -> Result<WorkSchedule, AvailabilityError> {
        debug!("Updating schedule for barber: {}", barber_id);

        schedule.validate()?;

        let update_data = json!({
            "start_time": schedule.start_time.format("%H:%M:%S").to_string(),
            "end_time": schedule.end_time.format("%H:%M:%S").to_string(),
            "lunch_start": schedule.lunch_start.format("%H:%M:%S").to_string(),
            "lunch_end": schedule.lunch_end.format("%H:%M:%S").to_string(),
            "days_off": schedule.days_off,
            "slot_granularity_minutes": schedule.slot_granularity_minutes,
        });

        let path = format!("/rest/v1/barbers?id=eq.{}", barber_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(update_data), Some(headers))
            .await
            .map_err(|e| AvailabilityError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(AvailabilityError::BarberNotFound(barber_id));
        };

        serde_json::from_value(row)
            .map_err(|e| AvailabilityError::StoreUnavailable(format!("failed to parse schedule row: {}", e)))
    }
}
