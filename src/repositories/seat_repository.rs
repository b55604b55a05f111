//! Seat inventory store.
//!
//! The claim/release pair is the only mutation path bookings use. The
//! claim is a single conditional UPDATE whose predicate re-asserts
//! availability; the caller compares the affected-row count against the
//! requested count to detect concurrent claimants. Row locks taken by
//! the UPDATE serialize overlapping claims across server instances.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::seat::Seat;
use crate::utils::errors::{is_unique_violation, AppError, AppResult};

pub struct SeatRepository {
    pool: PgPool,
}

impl SeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bulk-creates seats for a bus. Fails with Conflict if any label
    /// already exists for the bus.
    pub async fn create_for_bus(&self, bus_id: Uuid, seat_numbers: &[String]) -> AppResult<Vec<Seat>> {
        let ids: Vec<Uuid> = seat_numbers.iter().map(|_| Uuid::new_v4()).collect();

        let seats = sqlx::query_as::<_, Seat>(
            r#"
            INSERT INTO seats (id, bus_id, seat_number, is_available)
            SELECT id, $2::uuid, seat_number, TRUE
            FROM UNNEST($1::uuid[], $3::text[]) AS t(id, seat_number)
            RETURNING *
            "#,
        )
        .bind(&ids)
        .bind(bus_id)
        .bind(seat_numbers)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("One or more seat numbers already exist for bus {}", bus_id))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(seats)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Seat>> {
        let seat = sqlx::query_as::<_, Seat>("SELECT * FROM seats WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(seat)
    }

    pub async fn find_by_bus(&self, bus_id: Uuid) -> AppResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats WHERE bus_id = $1 ORDER BY seat_number",
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(seats)
    }

    pub async fn find_available_by_bus(&self, bus_id: Uuid) -> AppResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats WHERE bus_id = $1 AND is_available ORDER BY seat_number",
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(seats)
    }

    pub async fn find_by_bus_and_number(&self, bus_id: Uuid, seat_number: &str) -> AppResult<Option<Seat>> {
        let seat = sqlx::query_as::<_, Seat>(
            "SELECT * FROM seats WHERE bus_id = $1 AND seat_number = $2",
        )
        .bind(bus_id)
        .bind(seat_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seat)
    }

    pub async fn count_for_bus(&self, bus_id: Uuid) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seats WHERE bus_id = $1")
            .bind(bus_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Counts currently-available seats for a bus inside the claim
    /// transaction (the allocator's fast sold-out rejection).
    pub async fn count_available(&self, conn: &mut PgConnection, bus_id: Uuid) -> AppResult<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM seats WHERE bus_id = $1 AND is_available")
                .bind(bus_id)
                .fetch_one(conn)
                .await?;

        Ok(count.0)
    }

    /// Fetches the requested labels that are still available on the bus.
    /// A short result means some labels are invalid, belong elsewhere,
    /// or were claimed concurrently.
    pub async fn find_available_by_labels(
        &self,
        conn: &mut PgConnection,
        bus_id: Uuid,
        seat_numbers: &[String],
    ) -> AppResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT * FROM seats
            WHERE bus_id = $1 AND seat_number = ANY($2) AND is_available
            "#,
        )
        .bind(bus_id)
        .bind(seat_numbers)
        .fetch_all(conn)
        .await?;

        Ok(seats)
    }

    /// Conditionally claims the given seats for a booking. The predicate
    /// re-asserts availability at claim time; returns the number of rows
    /// actually claimed. The caller rolls back unless it equals the
    /// requested count.
    pub async fn claim(
        &self,
        conn: &mut PgConnection,
        bus_id: Uuid,
        seat_numbers: &[String],
        booking_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE seats
            SET is_available = FALSE, booking_id = $3
            WHERE bus_id = $1 AND seat_number = ANY($2) AND is_available
            "#,
        )
        .bind(bus_id)
        .bind(seat_numbers)
        .bind(booking_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Releases the given seats. Idempotent: already-available seats are
    /// untouched and do not count as an error.
    pub async fn release(
        &self,
        conn: &mut PgConnection,
        bus_id: Uuid,
        seat_numbers: &[String],
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE seats
            SET is_available = TRUE, booking_id = NULL
            WHERE bus_id = $1 AND seat_number = ANY($2) AND NOT is_available
            "#,
        )
        .bind(bus_id)
        .bind(seat_numbers)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Releases every seat held by a booking (cancellation path).
    pub async fn release_by_booking(&self, conn: &mut PgConnection, booking_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE seats
            SET is_available = TRUE, booking_id = NULL
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Administrative bulk release of every seat on a bus.
    pub async fn release_all_for_bus(&self, bus_id: Uuid) -> AppResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            UPDATE seats
            SET is_available = TRUE, booking_id = NULL
            WHERE bus_id = $1
            RETURNING *
            "#,
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(seats)
    }

    /// Frees seats left unavailable with no live confirmed booking, the
    /// recovery path for claims stranded by a crash mid-transaction.
    pub async fn release_orphaned(&self) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE seats s
            SET is_available = TRUE, booking_id = NULL
            WHERE NOT s.is_available
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.id = s.booking_id AND b.status = 'confirmed'
              )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Renames a seat, keeping labels unique per bus.
    pub async fn update_seat(
        &self,
        bus_id: Uuid,
        seat_number: &str,
        new_seat_number: Option<&str>,
        is_available: Option<bool>,
    ) -> AppResult<Option<Seat>> {
        let seat = sqlx::query_as::<_, Seat>(
            r#"
            UPDATE seats
            SET seat_number = COALESCE($3, seat_number),
                is_available = COALESCE($4, is_available)
            WHERE bus_id = $1 AND seat_number = $2
            RETURNING *
            "#,
        )
        .bind(bus_id)
        .bind(seat_number)
        .bind(new_seat_number)
        .bind(is_available)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Seat number '{}' is already in use on this bus",
                    new_seat_number.unwrap_or(seat_number)
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(seat)
    }

    pub async fn delete_by_bus_and_number(&self, bus_id: Uuid, seat_number: &str) -> AppResult<Option<Seat>> {
        let seat = sqlx::query_as::<_, Seat>(
            "DELETE FROM seats WHERE bus_id = $1 AND seat_number = $2 RETURNING *",
        )
        .bind(bus_id)
        .bind(seat_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seat)
    }

    pub async fn delete_all_by_bus(&self, bus_id: Uuid) -> AppResult<Vec<Seat>> {
        let seats = sqlx::query_as::<_, Seat>("DELETE FROM seats WHERE bus_id = $1 RETURNING *")
            .bind(bus_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(seats)
    }
}
