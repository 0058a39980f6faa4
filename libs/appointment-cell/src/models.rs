// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Statuses that keep their `[starts_at, ends_at)` interval reserved.
    pub fn is_blocking(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Who the appointment is for: a registered customer, or a walk-in guest
/// identified by name and phone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Registered { customer_id: Uuid },
    Guest { name: String, phone: String },
}

impl CustomerRef {
    pub fn validate(&self) -> Result<(), BookingError> {
        match self {
            CustomerRef::Registered { .. } => Ok(()),
            CustomerRef::Guest { name, phone } => {
                if name.trim().is_empty() {
                    return Err(BookingError::Validation {
                        field: "customer.name",
                        reason: "guest name must not be empty".to_string(),
                    });
                }
                if phone.trim().is_empty() {
                    return Err(BookingError::Validation {
                        field: "customer.phone",
                        reason: "guest phone must not be empty".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// How the booking entered the system. Staff entries are recorded as already
/// confirmed by the provider; both channels pass the same conflict checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingChannel {
    #[default]
    SelfService,
    Staff,
}

impl BookingChannel {
    pub fn initial_status(&self) -> AppointmentStatus {
        match self {
            BookingChannel::SelfService => AppointmentStatus::Pending,
            BookingChannel::Staff => AppointmentStatus::Confirmed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub customer: CustomerRef,
    #[serde(default)]
    pub channel: BookingChannel,
    pub idempotency_key: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("requested interval {starts_at}..{ends_at} is already booked")]
    Conflict {
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: Uuid },

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("booking store unavailable: {0}")]
    StoreUnavailable(String),
}
