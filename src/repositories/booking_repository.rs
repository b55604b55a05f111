//! Booking ledger rows.
//!
//! Bookings are never physically deleted; cancellation is a one-way
//! status flip guarded by the current status so a concurrent or retried
//! cancel cannot release seats twice. Projections join the seat log,
//! which preserves the booked seat set even after cancellation clears
//! the per-seat linkage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::booking::{Booking, STATUS_CANCELLED, STATUS_CONFIRMED};
use crate::utils::errors::AppResult;

/// Booking joined with its audit entry's seat list.
#[derive(Debug, sqlx::FromRow)]
pub struct BookingWithSeats {
    pub id: Uuid,
    pub user_id: Uuid,
    pub schedule_id: Uuid,
    pub total_fare: Decimal,
    pub status: String,
    pub booking_date: DateTime<Utc>,
    pub seats: Option<String>,
}

const WITH_SEATS_SELECT: &str = r#"
    SELECT b.id, b.user_id, b.schedule_id, b.total_fare, b.status, b.booking_date, sl.seats
    FROM bookings b
    LEFT JOIN seat_logs sl ON sl.booking_id = b.id
"#;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a confirmed booking inside the booking transaction.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        schedule_id: Uuid,
        total_fare: Decimal,
    ) -> AppResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, schedule_id, total_fare, status, booking_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(schedule_id)
        .bind(total_fare)
        .bind(STATUS_CONFIRMED)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(booking)
    }

    /// Flips a confirmed booking to cancelled. Returns None when the
    /// booking is absent or already cancelled, making retries no-ops.
    pub async fn mark_cancelled(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2
            WHERE id = $1 AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(STATUS_CANCELLED)
        .bind(STATUS_CONFIRMED)
        .fetch_optional(conn)
        .await?;

        Ok(booking)
    }

    pub async fn find_with_seats_by_id(&self, id: Uuid) -> AppResult<Option<BookingWithSeats>> {
        let query = format!("{} WHERE b.id = $1", WITH_SEATS_SELECT);
        let booking = sqlx::query_as::<_, BookingWithSeats>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn list_with_seats_by_user(&self, user_id: Uuid) -> AppResult<Vec<BookingWithSeats>> {
        let query = format!("{} WHERE b.user_id = $1 ORDER BY b.booking_date DESC", WITH_SEATS_SELECT);
        let bookings = sqlx::query_as::<_, BookingWithSeats>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    pub async fn list_with_seats_by_schedule(&self, schedule_id: Uuid) -> AppResult<Vec<BookingWithSeats>> {
        let query = format!("{} WHERE b.schedule_id = $1 ORDER BY b.booking_date DESC", WITH_SEATS_SELECT);
        let bookings = sqlx::query_as::<_, BookingWithSeats>(&query)
            .bind(schedule_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }
}
