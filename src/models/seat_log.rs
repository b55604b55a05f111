//! Seat log entity (audit trail).
//!
//! Append-only: one row per successful booking, written inside the
//! booking transaction, never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Seat log row - `seats` is the comma-joined label list in booking order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeatLog {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub bus_id: Uuid,
    pub seats: String,
    pub date_booked: DateTime<Utc>,
}
