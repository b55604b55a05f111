//! Booking request/response shapes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::seat_log::SeatLog;

/// Request to book seats on a schedule.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookTicketRequest {
    pub user_id: Uuid,

    pub schedule_id: Uuid,

    #[validate(length(min = 1, message = "at least one seat must be selected"))]
    pub selected_seats: Vec<String>,
}

/// Request to search schedules by origin/destination/date.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchBusRequest {
    #[validate(length(min = 1, max = 100))]
    pub origin: String,

    #[validate(length(min = 1, max = 100))]
    pub destination: String,

    pub travel_date: NaiveDate,
}

/// Booking projection returned to the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub schedule_id: Uuid,
    pub reserved_seats: Vec<String>,
    pub total_fare: Decimal,
    pub status: String,
    pub booking_date: DateTime<Utc>,
}

/// One search hit: schedule joined with bus, route and live seat count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusSearchResult {
    pub schedule_id: Uuid,
    pub bus_id: Uuid,
    pub route_id: Uuid,
    pub bus_name: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub fare: Decimal,
    pub travel_date: NaiveDate,
    pub available_seats: i64,
}

/// Seat log projection. `seats` is the comma-joined label list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatLogResponse {
    pub seat_log_id: Uuid,
    pub booking_id: Uuid,
    pub bus_id: Uuid,
    pub seats: String,
    pub date_booked: DateTime<Utc>,
}

impl From<SeatLog> for SeatLogResponse {
    fn from(log: SeatLog) -> Self {
        Self {
            seat_log_id: log.id,
            booking_id: log.booking_id,
            bus_id: log.bus_id,
            seats: log.seats,
            date_booked: log.date_booked,
        }
    }
}
