// libs/catalog-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A bookable service as offered by the shop. The duration decides how much
/// of the day an appointment occupies; inactive offerings stay in the
/// catalog for history but cannot be booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub duration_minutes: i32,
    pub price: Option<f64>,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_name(&self.name)?;
        validate_duration(self.duration_minutes)?;
        validate_price(self.price)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(duration) = self.duration_minutes {
            validate_duration(duration)?;
        }
        validate_price(self.price)?;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation {
            field: "name",
            reason: "service name must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_duration(duration_minutes: i32) -> Result<(), CatalogError> {
    if duration_minutes <= 0 {
        return Err(CatalogError::Validation {
            field: "duration_minutes",
            reason: "service duration must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_price(price: Option<f64>) -> Result<(), CatalogError> {
    if let Some(price) = price {
        if price < 0.0 {
            return Err(CatalogError::Validation {
                field: "price",
                reason: "price must not be negative".to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("service not found")]
    NotFound,

    #[error("validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("catalog store unavailable: {0}")]
    StoreUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(name: &str, duration_minutes: i32, price: Option<f64>) -> CreateServiceRequest {
        CreateServiceRequest {
            name: name.to_string(),
            duration_minutes,
            price,
        }
    }

    #[test]
    fn accepts_a_well_formed_service() {
        assert!(request("Haircut", 30, Some(150.0)).validate().is_ok());
        assert!(request("Beard Trim", 45, None).validate().is_ok());
    }

    #[test]
    fn rejects_blank_names() {
        let err = request("   ", 30, None).validate().unwrap_err();
        assert_matches!(err, CatalogError::Validation { field: "name", .. });
    }

    #[test]
    fn rejects_non_positive_durations() {
        let err = request("Haircut", 0, None).validate().unwrap_err();
        assert_matches!(err, CatalogError::Validation { field: "duration_minutes", .. });

        let err = request("Haircut", -15, None).validate().unwrap_err();
        assert_matches!(err, CatalogError::Validation { field: "duration_minutes", .. });
    }

    #[test]
    fn rejects_negative_prices() {
        let err = request("Haircut", 30, Some(-1.0)).validate().unwrap_err();
        assert_matches!(err, CatalogError::Validation { field: "price", .. });
    }

    #[test]
    fn update_validates_only_provided_fields() {
        let update = UpdateServiceRequest {
            name: None,
            duration_minutes: None,
            price: None,
            is_active: Some(false),
        };
        assert!(update.validate().is_ok());

        let update = UpdateServiceRequest {
            name: None,
            duration_minutes: Some(-5),
            price: None,
            is_active: None,
        };
        assert_matches!(
            update.validate().unwrap_err(),
            CatalogError::Validation { field: "duration_minutes", .. }
        );
    }
}
