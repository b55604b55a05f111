//! Bus request/response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bus::Bus;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBusRequest {
    #[validate(length(min = 1, max = 50))]
    pub bus_number: String,

    #[validate(length(min = 1, max = 100))]
    pub bus_name: String,

    #[validate(length(min = 1, max = 50))]
    pub bus_type: String,

    #[validate(range(min = 1, max = 120))]
    pub total_seats: i32,

    #[validate(length(max = 255))]
    pub amenities: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBusRequest {
    #[validate(length(min = 1, max = 100))]
    pub bus_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub bus_type: Option<String>,

    #[validate(length(max = 255))]
    pub amenities: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusResponse {
    pub id: Uuid,
    pub bus_number: String,
    pub bus_name: String,
    pub bus_type: String,
    pub total_seats: i32,
    pub amenities: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Bus> for BusResponse {
    fn from(bus: Bus) -> Self {
        Self {
            id: bus.id,
            bus_number: bus.bus_number,
            bus_name: bus.bus_name,
            bus_type: bus.bus_type,
            total_seats: bus.total_seats,
            amenities: bus.amenities,
            created_at: bus.created_at,
        }
    }
}
