// libs/barber-cell/src/services/slots.rs
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::models::WorkSchedule;

/// Candidate appointment start times for one day, walking the working hours
/// on the schedule's slot grid. Start points only: whether a given service
/// duration actually fits a candidate is the availability service's job.
///
/// Returns an empty list on days off. Grid cells that touch the lunch window
/// are skipped. Values are times of day; the caller pairs them with `date`.
pub fn generate_slots(schedule: &WorkSchedule, date: NaiveDate) -> Vec<NaiveTime> {
    if schedule.is_day_off(date.weekday()) {
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(schedule.slot_granularity_minutes));
    let mut slots = Vec::new();
    let mut current = schedule.start_time;

    while current < schedule.end_time {
        let (cell_end, wrapped) = current.overflowing_add_signed(step);
        // A cell running past midnight is clamped to the end of the working
        // day for the lunch test; lunch always lies within working hours.
        let cell_end = if wrapped != 0 { schedule.end_time } else { cell_end };

        if !schedule.lunch_overlaps(current, cell_end) {
            slots.push(current);
        }

        if wrapped != 0 {
            break;
        }
        current = cell_end;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayOfWeek;

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

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    // 2025-11-18 is a Tuesday, 2025-11-16 a Sunday.
    const TUESDAY: (i32, u32, u32) = (2025, 11, 18);
    const SUNDAY: (i32, u32, u32) = (2025, 11, 16);

    fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn walks_working_hours_and_skips_lunch() {
        let slots = generate_slots(&schedule(), date(TUESDAY));

        let mut expected: Vec<NaiveTime> = Vec::new();
        for hour in 9..12 {
            expected.push(hm(hour, 0));
            expected.push(hm(hour, 30));
        }
        for hour in 13..18 {
            expected.push(hm(hour, 0));
            expected.push(hm(hour, 30));
        }

        assert_eq!(slots, expected);
        assert!(!slots.contains(&hm(12, 0)));
        assert!(!slots.contains(&hm(12, 30)));
    }

    #[test]
    fn day_off_produces_no_slots() {
        assert!(generate_slots(&schedule(), date(SUNDAY)).is_empty());
    }

    #[test]
    fn slots_are_strictly_ascending() {
        let slots = generate_slots(&schedule(), date(TUESDAY));
        assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn zero_length_lunch_excludes_nothing() {
        let mut s = schedule();
        s.lunch_end = s.lunch_start;

        let slots = generate_slots(&s, date(TUESDAY));
        assert_eq!(slots.len(), 18);
        assert!(slots.contains(&hm(12, 0)));
        assert!(slots.contains(&hm(12, 30)));
    }

    #[test]
    fn coarse_granularity_straddling_lunch_drops_the_cell() {
        let mut s = schedule();
        s.slot_granularity_minutes = 45;

        let slots = generate_slots(&s, date(TUESDAY));
        // The 11:15 cell runs to 12:00 and stays; 12:00 and 12:45 touch the
        // lunch window and are dropped; 13:30 is the first clean cell after.
        assert!(slots.contains(&hm(11, 15)));
        assert!(!slots.contains(&hm(12, 0)));
        assert!(!slots.contains(&hm(12, 45)));
        assert!(slots.contains(&hm(13, 30)));
    }

    #[test]
    fn repeated_calls_yield_identical_sequences() {
        let s = schedule();
        assert_eq!(generate_slots(&s, date(TUESDAY)), generate_slots(&s, date(TUESDAY)));
    }

    #[test]
    fn late_schedule_terminates_at_midnight() {
        let mut s = schedule();
        s.start_time = hm(22, 0);
        s.end_time = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        s.lunch_start = hm(22, 0);
        s.lunch_end = hm(22, 0);
        s.slot_granularity_minutes = 45;

        let slots = generate_slots(&s, date(TUESDAY));
        assert_eq!(slots, vec![hm(22, 0), hm(22, 45), hm(23, 30)]);
    }
}
