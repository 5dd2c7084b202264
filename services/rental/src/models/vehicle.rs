//! Vehicle records as served by the fleet catalog

use serde::{Deserialize, Serialize};

/// Technical details block shown on the listing card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSpecs {
    pub seats: u32,
    pub fuel: String,
    pub mileage: String,
}

/// Vehicle entity from the catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: u64,
    pub name: String,
    pub image: String,
    pub price_per_hour: u64,
    /// Cities the vehicle can be picked up in
    pub cities: Vec<String>,
    pub specs: VehicleSpecs,
    #[serde(rename = "type")]
    pub vehicle_type: String,
}
