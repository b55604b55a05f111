//! Seat allocator: validates and claims seats for a booking.
//!
//! Availability is checked twice inside the booking transaction: a
//! cheap count for the common sold-out case, then a per-label fetch
//! that names the exact seats that are invalid or taken. The claim
//! itself is a conditional UPDATE whose predicate re-asserts
//! availability, so two claimants racing for an overlapping seat set
//! produce at most one winner; the loser sees a short row count and
//! rolls back with no partial claim.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::seat::Seat;
use crate::repositories::seat_repository::SeatRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct SeatAllocator {
    seats: SeatRepository,
}

impl SeatAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            seats: SeatRepository::new(pool),
        }
    }

    /// Steps 1-3 of the claim contract: rejects an empty request,
    /// rejects when the bus has fewer free seats than requested, and
    /// rejects when any requested label is not currently available.
    /// Read-only; makes no mutation.
    pub async fn check_inventory(
        &self,
        conn: &mut PgConnection,
        bus_id: Uuid,
        seat_numbers: &[String],
    ) -> AppResult<Vec<Seat>> {
        if seat_numbers.is_empty() {
            return Err(AppError::BadRequest("At least one seat must be selected".to_string()));
        }

        let requested = seat_numbers.len() as i64;
        let available = self.seats.count_available(conn, bus_id).await?;
        if available < requested {
            return Err(AppError::InsufficientInventory { requested, available });
        }

        let matched = self.seats.find_available_by_labels(conn, bus_id, seat_numbers).await?;
        if matched.len() != seat_numbers.len() {
            let missing = missing_labels(seat_numbers, &matched);
            return Err(AppError::SeatsUnavailable(format!(
                "Seat(s) {} already taken or not on this bus",
                missing.join(", ")
            )));
        }

        Ok(matched)
    }

    /// Step 4: conditionally claims exactly the requested seats for the
    /// booking. Returns Ok(false) when a concurrent claimant raced past
    /// the check for an overlapping subset, in which case nothing was
    /// durably claimed and the caller must roll back (and may retry the
    /// whole check-and-claim once).
    pub async fn claim(
        &self,
        conn: &mut PgConnection,
        bus_id: Uuid,
        seat_numbers: &[String],
        booking_id: Uuid,
    ) -> AppResult<bool> {
        let claimed = self.seats.claim(conn, bus_id, seat_numbers, booking_id).await?;
        Ok(claimed == seat_numbers.len() as u64)
    }

    /// Releases the given seats; a no-op for seats already available.
    pub async fn release(
        &self,
        conn: &mut PgConnection,
        bus_id: Uuid,
        seat_numbers: &[String],
    ) -> AppResult<u64> {
        self.seats.release(conn, bus_id, seat_numbers).await
    }

    /// Releases every seat held by a booking (cancellation path).
    pub async fn release_by_booking(
        &self,
        conn: &mut PgConnection,
        booking_id: Uuid,
    ) -> AppResult<u64> {
        self.seats.release_by_booking(conn, booking_id).await
    }

    /// Reconciliation sweep: frees seats marked unavailable with no
    /// live confirmed booking (claims stranded by a crash between
    /// claim and booking commit).
    pub async fn release_orphaned(&self) -> AppResult<u64> {
        self.seats.release_orphaned().await
    }
}

/// Requested labels with no matching available seat, in request order.
pub fn missing_labels(requested: &[String], matched: &[Seat]) -> Vec<String> {
    requested
        .iter()
        .filter(|label| !matched.iter().any(|seat| &seat.seat_number == *label))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(label: &str) -> Seat {
        Seat {
            id: Uuid::new_v4(),
            bus_id: Uuid::new_v4(),
            seat_number: label.to_string(),
            is_available: true,
            booking_id: None,
        }
    }

    #[test]
    fn test_missing_labels_all_matched() {
        let requested = vec!["A1".to_string(), "A2".to_string()];
        let matched = vec![seat("A1"), seat("A2")];
        assert!(missing_labels(&requested, &matched).is_empty());
    }

    #[test]
    fn test_missing_labels_reports_unmatched_in_request_order() {
        let requested = vec!["A3".to_string(), "A1".to_string(), "B9".to_string()];
        let matched = vec![seat("A1")];
        assert_eq!(missing_labels(&requested, &matched), vec!["A3".to_string(), "B9".to_string()]);
    }

    #[test]
    fn test_missing_labels_empty_match() {
        let requested = vec!["A1".to_string()];
        assert_eq!(missing_labels(&requested, &[]), vec!["A1".to_string()]);
    }
}
