//! Bus entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bus row - maps exactly to the buses table.
/// `total_seats` is the declared capacity; seat configuration must not
/// create more labels than this.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bus {
    pub id: Uuid,
    pub bus_number: String,
    pub bus_name: String,
    pub bus_type: String,
    pub total_seats: i32,
    pub amenities: Option<String>,
    pub created_at: DateTime<Utc>,
}
