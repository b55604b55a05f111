//! Seat entity.
//!
//! Invariant: `is_available == false` iff `booking_id` points to a live
//! (confirmed) booking. The reconciliation sweep restores the invariant
//! after a crash between claim and booking commit.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Seat row - maps exactly to the seats table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Seat {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub seat_number: String,
    pub is_available: bool,
    pub booking_id: Option<Uuid>,
}
