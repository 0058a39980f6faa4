// libs/barber-cell/tests/availability_test.rs
use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use barber_cell::models::AvailabilityError;
use barber_cell::services::availability::AvailabilityService;
use barber_cell::services::schedule::ScheduleService;
use catalog_cell::models::ServiceOffering;
use shared_config::AppConfig;

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

struct TestSetup {
    availability: AvailabilityService,
    schedule: ScheduleService,
    mock_server: MockServer,
    barber_id: Uuid,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;

        let config = AppConfig {
            supabase_url: mock_server.uri(),
            supabase_service_key: "test-key".to_string(),
        };

        Self {
            availability: AvailabilityService::new(&config),
            schedule: ScheduleService::new(&config),
            mock_server,
            barber_id: Uuid::new_v4(),
        }
    }

    /// 09:00-18:00 working day, lunch 12:00-13:00, Sundays off, 30-minute grid.
    async fn mount_schedule(&self) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/barbers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![serde_json::json!({
                "start_time": "09:00:00",
                "end_time": "18:00:00",
                "lunch_start": "12:00:00",
                "lunch_end": "13:00:00",
                "days_off": ["sunday"],
                "slot_granularity_minutes": 30
            })]))
            .mount(&self.mock_server)
            .await;
    }

    async fn mount_appointments(&self, rows: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/appointments"))
            .and(query_param("barber_id", format!("eq.{}", self.barber_id)))
            .and(query_param("status", "in.(pending,confirmed)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.mock_server)
            .await;
    }
}

fn haircut(duration_minutes: i32) -> ServiceOffering {
    ServiceOffering {
        id: Uuid::new_v4(),
        name: "Haircut".to_string(),
        duration_minutes,
        price: Some(150.0),
        is_active: true,
        created_at: "2025-11-01T09:00:00Z".parse().unwrap(),
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

// 2025-11-18 is a Tuesday, 2025-11-16 a Sunday.
fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 18).unwrap()
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 16).unwrap()
}

fn booked(date: NaiveDate, start: (u32, u32), end: (u32, u32)) -> serde_json::Value {
    serde_json::json!({
        "starts_at": date.and_time(hm(start.0, start.1)).and_utc().to_rfc3339(),
        "ends_at": date.and_time(hm(end.0, end.1)).and_utc().to_rfc3339(),
    })
}

// ==============================================================================
// AVAILABILITY SCENARIOS
// ==============================================================================

#[tokio::test]
async fn open_tuesday_offers_every_grid_slot_outside_lunch() {
    let setup = TestSetup::new().await;
    setup.mount_schedule().await;
    setup.mount_appointments(vec![]).await;

    let slots = setup
        .availability
        .get_available_slots(setup.barber_id, tuesday(), &haircut(30))
        .await
        .unwrap();

    let mut expected: Vec<NaiveTime> = Vec::new();
    for hour in 9..12 {
        expected.push(hm(hour, 0));
        expected.push(hm(hour, 30));
    }
    for hour in 13..18 {
        expected.push(hm(hour, 0));
        expected.push(hm(hour, 30));
    }

    let starts: Vec<NaiveTime> = slots.iter().map(|slot| slot.start_time).collect();
    assert_eq!(starts, expected);
    assert!(slots.iter().all(|slot| slot.is_available));

    // 17:30 + 30 minutes lands exactly on closing time and is still valid.
    assert_eq!(starts.last(), Some(&hm(17, 30)));
}

#[tokio::test]
async fn day_off_yields_an_empty_slot_list() {
    let setup = TestSetup::new().await;
    setup.mount_schedule().await;
    setup.mount_appointments(vec![]).await;

    let slots = setup
        .availability
        .get_available_slots(setup.barber_id, sunday(), &haircut(30))
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn booked_interval_blocks_direct_and_straddling_candidates() {
    let setup = TestSetup::new().await;
    setup.mount_schedule().await;
    setup
        .mount_appointments(vec![booked(tuesday(), (10, 0), (10, 30))])
        .await;

    // 30-minute service: only the 10:00 slot is taken.
    let slots = setup
        .availability
        .get_available_slots(setup.barber_id, tuesday(), &haircut(30))
        .await
        .unwrap();

    let free: Vec<NaiveTime> = slots
        .iter()
        .filter(|slot| slot.is_available)
        .map(|slot| slot.start_time)
        .collect();
    assert!(!free.contains(&hm(10, 0)));
    assert!(free.contains(&hm(9, 30)));
    assert!(free.contains(&hm(10, 30)));

    // 60-minute service: 09:30 would run into the booking and is busy too.
    let slots = setup
        .availability
        .get_available_slots(setup.barber_id, tuesday(), &haircut(60))
        .await
        .unwrap();

    let free: Vec<NaiveTime> = slots
        .iter()
        .filter(|slot| slot.is_available)
        .map(|slot| slot.start_time)
        .collect();
    assert!(!free.contains(&hm(9, 30)));
    assert!(!free.contains(&hm(10, 0)));
    assert!(free.contains(&hm(9, 0)));
}

#[tokio::test]
async fn long_services_lose_slots_that_cannot_finish_in_time() {
    let setup = TestSetup::new().await;
    setup.mount_schedule().await;
    setup.mount_appointments(vec![]).await;

    let slots = setup
        .availability
        .get_available_slots(setup.barber_id, tuesday(), &haircut(60))
        .await
        .unwrap();

    let starts: Vec<NaiveTime> = slots.iter().map(|slot| slot.start_time).collect();

    // 17:30 cannot finish by 18:00; 11:30 would cross into lunch.
    assert!(!starts.contains(&hm(17, 30)));
    assert!(!starts.contains(&hm(11, 30)));
    assert_eq!(starts.last(), Some(&hm(17, 0)));
    assert!(starts.contains(&hm(11, 0)));
}

#[tokio::test]
async fn identical_queries_return_identical_results() {
    let setup = TestSetup::new().await;
    setup.mount_schedule().await;
    setup
        .mount_appointments(vec![booked(tuesday(), (14, 0), (14, 30))])
        .await;

    let service = haircut(30);
    let first = setup
        .availability
        .get_available_slots(setup.barber_id, tuesday(), &service)
        .await
        .unwrap();
    let second = setup
        .availability
        .get_available_slots(setup.barber_id, tuesday(), &service)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_barber_row_maps_to_schedule_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/barbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .availability
        .get_available_slots(setup.barber_id, tuesday(), &haircut(30))
        .await;

    assert_matches!(result, Err(AvailabilityError::ScheduleNotFound(id)) if id == setup.barber_id);
}

// ==============================================================================
// SCHEDULE WRITES
// ==============================================================================

#[tokio::test]
async fn inconsistent_schedule_is_rejected_before_the_store_sees_it() {
    let setup = TestSetup::new().await;

    // No PATCH mock mounted: reaching the store would fail the test.
    let schedule: barber_cell::models::WorkSchedule = serde_json::from_value(serde_json::json!({
        "start_time": "18:00:00",
        "end_time": "09:00:00",
        "lunch_start": "18:00:00",
        "lunch_end": "18:00:00",
        "days_off": [],
        "slot_granularity_minutes": 30
    }))
    .unwrap();

    let result = setup.schedule.update_schedule(setup.barber_id, schedule).await;

    assert_matches!(
        result,
        Err(AvailabilityError::InvalidSchedule(
            barber_cell::models::ScheduleValidationError::StartAfterEnd
        ))
    );
}
