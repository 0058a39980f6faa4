// libs/barber-cell/src/services/availability.rs
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use catalog_cell::models::ServiceOffering;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AvailabilityError, BookedInterval, SlotAvailability};
use crate::services::schedule::ScheduleService;
use crate::services::slots;

/// Computes the bookable slots of a day for one barber and one service:
/// schedule template, then duration-aware feasibility, then the day's
/// still-blocking appointments.
pub struct AvailabilityService {
    supabase: SupabaseClient,
    schedule_service: ScheduleService,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            schedule_service: ScheduleService::new(config),
        }
    }

    /// Candidate start times for `date`, each marked free or taken.
    ///
    /// Candidates where the service cannot end inside working hours, or
    /// where it would run into the lunch window, are omitted entirely. The
    /// result is ascending, duplicate-free and a pure function of the
    /// schedule and the stored appointments.
    pub async fn get_available_slots(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
        service: &ServiceOffering,
    ) -> Result<Vec<SlotAvailability>, AvailabilityError> {
        debug!("Calculating available slots for barber {} on {}", barber_id, date);

        let schedule = self.schedule_service.get_schedule(barber_id).await?;

        let candidates = slots::generate_slots(&schedule, date);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let duration = Duration::minutes(i64::from(service.duration_minutes));
        let booked = self.get_booked_intervals(barber_id, date).await?;

        let mut result = Vec::with_capacity(candidates.len());
        for start in candidates {
            let (end, wrapped) = start.overflowing_add_signed(duration);
            if wrapped != 0 || end > schedule.end_time {
                continue;
            }
            if schedule.lunch_overlaps(start, end) {
                continue;
            }

            let starts_at = date.and_time(start).and_utc();
            let ends_at = date.and_time(end).and_utc();
            let is_available = !booked
                .iter()
                .any(|interval| overlaps(starts_at, ends_at, interval));

            result.push(SlotAvailability { start_time: start, is_available });
        }

        debug!(
            "Found {} feasible slots for barber {} on {} ({} free)",
            result.len(),
            barber_id,
            date,
            result.iter().filter(|slot| slot.is_available).count()
        );

        Ok(result)
    }

    /// Intervals of the day's appointments that still hold their slot,
    /// scoped to the barber and the date.
    async fn get_booked_intervals(
        &self,
        barber_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedInterval>, AvailabilityError> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = date.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?barber_id=eq.{}&status=in.(pending,confirmed)&starts_at=gte.{}&starts_at=lte.{}&select=starts_at,ends_at&order=starts_at.asc",
            barber_id,
            urlencoding::encode(&day_start.to_rfc3339()),
            urlencoding::encode(&day_end.to_rfc3339()),
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AvailabilityError::StoreUnavailable(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<BookedInterval>, _>>()
            .map_err(|e| AvailabilityError::StoreUnavailable(format!("failed to parse appointment rows: {}", e)))
    }
}

fn overlaps(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>, interval: &BookedInterval) -> bool {
    starts_at < interval.ends_at && ends_at > interval.starts_at
}
