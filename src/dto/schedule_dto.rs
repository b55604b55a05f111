//! Schedule request/response shapes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScheduleRequest {
    pub bus_id: Uuid,
    pub route_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub fare: Decimal,
    pub travel_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateScheduleRequest {
    pub bus_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub fare: Option<Decimal>,
    pub travel_date: Option<NaiveDate>,
}

/// Schedule joined with its bus and route for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub bus_name: String,
    pub route_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub fare: Decimal,
    pub travel_date: NaiveDate,
}
