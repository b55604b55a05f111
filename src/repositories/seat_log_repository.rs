//! Append-only audit log of booked seat sets.
//!
//! One row per successful booking, written inside the booking
//! transaction. No update or delete paths exist.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::seat_log::SeatLog;
use crate::utils::errors::AppResult;

pub struct SeatLogRepository {
    pool: PgPool,
}

impl SeatLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends the audit entry for a booking. `seats` is the
    /// comma-joined label list in booking order.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        booking_id: Uuid,
        bus_id: Uuid,
        seats: &str,
    ) -> AppResult<SeatLog> {
        let log = sqlx::query_as::<_, SeatLog>(
            r#"
            INSERT INTO seat_logs (id, booking_id, bus_id, seats, date_booked)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(bus_id)
        .bind(seats)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(log)
    }

    pub async fn find_by_booking_id(&self, booking_id: Uuid) -> AppResult<Option<SeatLog>> {
        let log = sqlx::query_as::<_, SeatLog>("SELECT * FROM seat_logs WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(log)
    }
}
