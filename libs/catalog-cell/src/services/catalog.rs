use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CatalogError, CreateServiceRequest, ServiceOffering, UpdateServiceRequest};

pub struct CatalogService {
    supabase: SupabaseClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// List service offerings, optionally restricted to bookable ones.
    pub async fn list_services(&self, active_only: bool) -> Result<Vec<ServiceOffering>, CatalogError> {
        debug!("Listing services (active_only: {})", active_only);

        let mut path = "/rest/v1/services?order=name.asc".to_string();
        if active_only {
            path.push_str("&is_active=eq.true");
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| CatalogError::StoreUnavailable(e.to_string()))?;

        parse_rows(result)
    }

    pub async fn get_service(&self, service_id: Uuid) -> Result<ServiceOffering, CatalogError> {
        debug!("Fetching service: {}", service_id);

        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| CatalogError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(CatalogError::NotFound);
        };

        serde_json::from_value(row)
            .map_err(|e| CatalogError::StoreUnavailable(format!("failed to parse service row: {}", e)))
    }

    pub async fn create_service(&self, request: CreateServiceRequest) -> Result<ServiceOffering, CatalogError> {
        debug!("Creating service: {}", request.name);

        request.validate()?;

        let service_data = json!({
            "id": Uuid::new_v4(),
            "name": request.name,
            "duration_minutes": request.duration_minutes,
            "price": request.price,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339(),
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, "/rest/v1/services", Some(service_data), Some(headers))
            .await
            .map_err(|e| CatalogError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(CatalogError::StoreUnavailable("service insert returned no row".to_string()));
        };

        serde_json::from_value(row)
            .map_err(|e| CatalogError::StoreUnavailable(format!("failed to parse service row: {}", e)))
    }

    pub async fn update_service(
        &self,
        service_id: Uuid,
        request: UpdateServiceRequest,
    ) -> Result<ServiceOffering, CatalogError> {
        debug!("Updating service: {}", service_id);

        request.validate()?;

        let mut update_data = serde_json::Map::new();
        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(duration) = request.duration_minutes {
            update_data.insert("duration_minutes".to_string(), json!(duration));
        }
        if let Some(price) = request.price {
            update_data.insert("price".to_string(), json!(price));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }

        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(Value::Object(update_data)), Some(headers))
            .await
            .map_err(|e| CatalogError::StoreUnavailable(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(CatalogError::NotFound);
        };

        serde_json::from_value(row)
            .map_err(|e| CatalogError::StoreUnavailable(format!("failed to parse service row: {}", e)))
    }
}

fn parse_rows(rows: Vec<Value>) -> Result<Vec<ServiceOffering>, CatalogError> {
    rows.into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<ServiceOffering>, _>>()
        .map_err(|e| CatalogError::StoreUnavailable(format!("failed to parse service rows: {}", e)))
}
