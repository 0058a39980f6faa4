pub mod availability;
pub mod schedule;
pub mod slots;

pub use availability::AvailabilityService;
pub use schedule::ScheduleService;
