//! Notification entity.
//!
//! Recorded fire-and-forget after a booking commit; delivery channels
//! are an external collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TYPE_BOOKING_CONFIRMED: &str = "booking_confirmed";
pub const TYPE_BOOKING_CANCELLED: &str = "booking_cancelled";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub notification_type: String,
    pub sent_date: DateTime<Utc>,
}
