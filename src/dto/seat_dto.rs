//! Seat request/response shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::seat::Seat;

/// Request to configure seating for a bus in bulk.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSeatsRequest {
    pub bus_id: Uuid,

    #[validate(length(min = 1, message = "at least one seat number is required"))]
    pub seat_numbers: Vec<String>,
}

/// Administrative release. An empty list releases every seat on the bus.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReleaseSeatsRequest {
    #[serde(default)]
    pub seat_numbers: Vec<String>,
}

/// Administrative per-seat update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSeatRequest {
    #[validate(length(min = 1, max = 10))]
    pub seat_number: Option<String>,

    pub is_available: Option<bool>,
}

/// Seat projection returned to the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatResponse {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub seat_number: String,
    pub is_available: bool,
    pub booking_id: Option<Uuid>,
}

impl From<Seat> for SeatResponse {
    fn from(seat: Seat) -> Self {
        Self {
            id: seat.id,
            bus_id: seat.bus_id,
            seat_number: seat.seat_number,
            is_available: seat.is_available,
            booking_id: seat.booking_id,
        }
    }
}
