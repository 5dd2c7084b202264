//! Fleet catalog client
//!
//! The vehicle inventory lives behind an external HTTP collaborator and
//! is fetched fresh on every listing; nothing is cached and nothing is
//! retried. A failed or undecodable fetch is logged and yields an empty
//! list.

use tracing::error;

use crate::models::Vehicle;

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the fleet service
    pub base_url: String,
}

impl CatalogConfig {
    /// Create a new CatalogConfig from environment variables
    ///
    /// # Environment Variables
    /// - `CATALOG_URL`: fleet service base URL (default: "http://localhost:4000")
    pub fn from_env() -> Self {
        CatalogConfig {
            base_url: std::env::var("CATALOG_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
        }
    }
}

/// HTTP client for the fleet catalog
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(config: &CatalogConfig) -> Self {
        CatalogClient {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    /// Fetch vehicles filtered by type and city
    pub async fn list_vehicles(
        &self,
        vehicle_type: Option<&str>,
        city: Option<&str>,
    ) -> Vec<Vehicle> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(vehicle_type) = vehicle_type {
            query.push(("type", vehicle_type));
        }
        if let Some(city) = city {
            query.push(("city", city));
        }

        let url = format!("{}/api/cars", self.base_url);
        let response = match self.client.get(&url).query(&query).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("Error fetching cars: {}", err);
                return Vec::new();
            }
        };

        match response.json::<Vec<Vehicle>>().await {
            Ok(vehicles) => vehicles,
            Err(err) => {
                error!("Error decoding cars: {}", err);
                Vec::new()
            }
        }
    }
}
