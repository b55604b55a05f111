//! Booking entity.
//!
//! A booking transitions once from `confirmed` to `cancelled` and is
//! never physically deleted. Its seat set and total fare are fixed at
//! creation; cancellation changes seat availability, not membership.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// Booking row - maps exactly to the bookings table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub schedule_id: Uuid,
    pub total_fare: Decimal,
    pub status: String,
    pub booking_date: DateTime<Utc>,
}
