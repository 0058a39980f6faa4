// libs/barber-cell/src/models.rs
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u32 = 30;

// ==============================================================================
// WORK SCHEDULE
// ==============================================================================

/// Day of the week as stored in a barber's days-off list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// A barber's recurring weekly template: working hours, lunch window, days
/// off and the slot grid. Equal lunch bounds disable the break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSchedule {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub lunch_start: NaiveTime,
    pub lunch_end: NaiveTime,
    pub days_off: Vec<DayOfWeek>,
    #[serde(default = "default_granularity")]
    pub slot_granularity_minutes: u32,
}

fn default_granularity() -> u32 {
    DEFAULT_SLOT_GRANULARITY_MINUTES
}

impl WorkSchedule {
    /// Check internal consistency. Invalid schedules are rejected before any
    /// write; they are never clamped into shape.
    pub fn validate(&self) -> Result<(), ScheduleValidationError> {
        if self.start_time >= self.end_time {
            return Err(ScheduleValidationError::StartAfterEnd);
        }

        if self.lunch_start > self.lunch_end
            || self.lunch_start < self.start_time
            || self.lunch_end > self.end_time
        {
            return Err(ScheduleValidationError::LunchOutOfRange);
        }

        if self.slot_granularity_minutes == 0 || self.slot_granularity_minutes > 24 * 60 {
            return Err(ScheduleValidationError::InvalidGranularity);
        }

        Ok(())
    }

    pub fn is_day_off(&self, weekday: Weekday) -> bool {
        self.days_off.contains(&DayOfWeek::from(weekday))
    }

    pub fn has_lunch_break(&self) -> bool {
        self.lunch_start < self.lunch_end
    }

    /// Half-open overlap of `[start, end)` with the lunch window. A
    /// zero-length window overlaps nothing.
    pub fn lunch_overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.has_lunch_break() && start < self.lunch_end && end > self.lunch_start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleValidationError {
    #[error("start_after_end: working hours must satisfy start < end")]
    StartAfterEnd,

    #[error("lunch_out_of_range: lunch break must lie within working hours")]
    LunchOutOfRange,

    #[error("invalid_granularity: slot granularity must be between 1 and 1440 minutes")]
    InvalidGranularity,
}

// ==============================================================================
// BARBER PROFILE
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barber {
    pub id: Uuid,
    pub display_name: String,
    #[serde(flatten)]
    pub schedule: WorkSchedule,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// One candidate start time for the queried date. Candidates that cannot fit
/// the requested service at all are omitted rather than marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub start_time: NaiveTime,
    pub is_available: bool,
}

/// Interval of an appointment that still holds its slot, as read back from
/// the appointments table.
#[derive(Debug, Clone, Deserialize)]
pub struct BookedInterval {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("barber {0} not found")]
    BarberNotFound(Uuid),

    #[error("no schedule configured for barber {0}")]
    ScheduleNotFound(Uuid),

    #[error(transparent)]
    InvalidSchedule(#[from] ScheduleValidationError),

    #[error("schedule store unavailable: {0}")]
    StoreUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> WorkSchedule {
        WorkSchedule {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            lunch_start: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            lunch_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            days_off: vec![DayOfWeek::Sunday],
            slot_granularity_minutes: 30,
        }
    }

    #[test]
    fn accepts_a_consistent_schedule() {
        assert!(schedule().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_working_hours() {
        let mut s = schedule();
        s.start_time = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        assert_eq!(s.validate(), Err(ScheduleValidationError::StartAfterEnd));

        s.start_time = s.end_time;
        assert_eq!(s.validate(), Err(ScheduleValidationError::StartAfterEnd));
    }

    #[test]
    fn rejects_lunch_outside_working_hours() {
        let mut s = schedule();
        s.lunch_end = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        assert_eq!(s.validate(), Err(ScheduleValidationError::LunchOutOfRange));

        let mut s = schedule();
        s.lunch_start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(s.validate(), Err(ScheduleValidationError::LunchOutOfRange));

        let mut s = schedule();
        s.lunch_start = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(s.validate(), Err(ScheduleValidationError::LunchOutOfRange));
    }

    #[test]
    fn zero_length_lunch_validates_and_excludes_nothing() {
        let mut s = schedule();
        s.lunch_end = s.lunch_start;
        assert!(s.validate().is_ok());
        assert!(!s.has_lunch_break());
        assert!(!s.lunch_overlaps(
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 30, 0).unwrap()
        ));
    }

    #[test]
    fn rejects_zero_granularity() {
        let mut s = schedule();
        s.slot_granularity_minutes = 0;
        assert_eq!(s.validate(), Err(ScheduleValidationError::InvalidGranularity));
    }

    #[test]
    fn lunch_overlap_is_half_open() {
        let s = schedule();
        // Ends exactly at lunch start: no overlap.
        assert!(!s.lunch_overlaps(
            NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        ));
        // Starts exactly at lunch end: no overlap.
        assert!(!s.lunch_overlaps(
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(13, 30, 0).unwrap()
        ));
        // Crosses into the window.
        assert!(s.lunch_overlaps(
            NaiveTime::from_hms_opt(11, 45, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 15, 0).unwrap()
        ));
    }

    #[test]
    fn days_off_match_chrono_weekdays() {
        let s = schedule();
        assert!(s.is_day_off(Weekday::Sun));
        assert!(!s.is_day_off(Weekday::Tue));
    }
}
