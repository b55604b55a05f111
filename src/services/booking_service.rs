//! Booking ledger: books seats, cancels bookings, projects bookings
//! and the seat audit log for the request layer.
//!
//! `book` runs resolve -> claim -> persist as one transaction. The seat
//! claim is conditional; when it comes up short against a concurrent
//! booking the whole transaction rolls back and the check-and-claim is
//! retried once before failing with SeatsUnavailable. A crash between
//! claim and commit leaves nothing visible; claims stranded by a crash
//! after partial hardware failure are swept by the reconciliation task.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{BookTicketRequest, BookingResponse, BusSearchResult, SearchBusRequest, SeatLogResponse};
use crate::models::booking::Booking;
use crate::models::notification::{TYPE_BOOKING_CANCELLED, TYPE_BOOKING_CONFIRMED};
use crate::models::schedule::Schedule;
use crate::repositories::booking_repository::{BookingRepository, BookingWithSeats};
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::seat_log_repository::SeatLogRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::notification_service::NotificationService;
use crate::services::seat_allocator::SeatAllocator;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{join_seat_labels, normalize_seat_labels};

/// One initial attempt plus one retry of the check-and-claim.
const MAX_CLAIM_ATTEMPTS: u32 = 2;

pub struct BookingService {
    pool: PgPool,
    schedules: ScheduleRepository,
    users: UserRepository,
    bookings: BookingRepository,
    seat_logs: SeatLogRepository,
    allocator: SeatAllocator,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            schedules: ScheduleRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            seat_logs: SeatLogRepository::new(pool.clone()),
            allocator: SeatAllocator::new(pool.clone()),
            pool,
        }
    }

    /// Books the requested seats on a schedule for a user.
    pub async fn book(&self, request: BookTicketRequest) -> AppResult<BookingResponse> {
        let seat_numbers = normalize_seat_labels(&request.selected_seats)?;

        let schedule = self
            .schedules
            .find_by_id(request.schedule_id)
            .await?
            .ok_or_else(|| not_found_error("Schedule", &request.schedule_id.to_string()))?;

        if !self.users.exists(request.user_id).await? {
            return Err(not_found_error("User", &request.user_id.to_string()));
        }

        // Price is locked in at booking time; later fare updates do not
        // touch existing bookings.
        let total_fare = schedule.fare * Decimal::from(seat_numbers.len() as u64);

        let mut attempts = 0;
        let booking = loop {
            attempts += 1;
            match self.try_book(&schedule, request.user_id, &seat_numbers, total_fare).await? {
                Some(booking) => break booking,
                None if attempts < MAX_CLAIM_ATTEMPTS => {
                    tracing::warn!(
                        bus_id = %schedule.bus_id,
                        "Seat claim contested by a concurrent booking, retrying"
                    );
                }
                None => {
                    return Err(AppError::SeatsUnavailable(
                        "Requested seats were claimed by a concurrent booking".to_string(),
                    ));
                }
            }
        };

        tracing::info!(
            booking_id = %booking.id,
            user_id = %booking.user_id,
            seats = %join_seat_labels(&seat_numbers),
            "Booking confirmed"
        );
        self.notify(
            booking.user_id,
            format!("Booking {} confirmed for {} seat(s)", booking.id, seat_numbers.len()),
            TYPE_BOOKING_CONFIRMED,
        );

        Ok(BookingResponse {
            booking_id: booking.id,
            user_id: booking.user_id,
            schedule_id: booking.schedule_id,
            reserved_seats: seat_numbers,
            total_fare: booking.total_fare,
            status: booking.status,
            booking_date: booking.booking_date,
        })
    }

    /// One check-and-claim attempt as a single transaction. Returns
    /// Ok(None) when the conditional claim lost to a concurrent booking
    /// (everything rolled back, safe to retry); typed failures from the
    /// inventory check are terminal.
    async fn try_book(
        &self,
        schedule: &Schedule,
        user_id: Uuid,
        seat_numbers: &[String],
        total_fare: Decimal,
    ) -> AppResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        self.allocator
            .check_inventory(&mut tx, schedule.bus_id, seat_numbers)
            .await?;

        let booking = self
            .bookings
            .insert(&mut tx, user_id, schedule.id, total_fare)
            .await?;

        if !self
            .allocator
            .claim(&mut tx, schedule.bus_id, seat_numbers, booking.id)
            .await?
        {
            tx.rollback().await?;
            return Ok(None);
        }

        self.seat_logs
            .insert(&mut tx, booking.id, schedule.bus_id, &join_seat_labels(seat_numbers))
            .await?;

        tx.commit().await?;
        Ok(Some(booking))
    }

    /// Cancels a booking, releasing its seats atomically. Returns false
    /// when the booking is absent or already cancelled (idempotent
    /// no-op). Booking and seat-log rows are never deleted.
    pub async fn cancel(&self, booking_id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let Some(booking) = self.bookings.mark_cancelled(&mut tx, booking_id).await? else {
            tx.rollback().await?;
            return Ok(false);
        };

        let released = self.allocator.release_by_booking(&mut tx, booking_id).await?;
        tx.commit().await?;

        tracing::info!(booking_id = %booking_id, released, "Booking cancelled");
        self.notify(
            booking.user_id,
            format!("Booking {} cancelled", booking_id),
            TYPE_BOOKING_CANCELLED,
        );

        Ok(true)
    }

    pub async fn get_by_booking_id(&self, booking_id: Uuid) -> AppResult<BookingResponse> {
        let booking = self
            .bookings
            .find_with_seats_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &booking_id.to_string()))?;

        Ok(to_response(booking))
    }

    /// Absent user yields an empty list, not an error.
    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.bookings.list_with_seats_by_user(user_id).await?;
        Ok(bookings.into_iter().map(to_response).collect())
    }

    /// Absent schedule yields an empty list, not an error.
    pub async fn list_by_schedule(&self, schedule_id: Uuid) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.bookings.list_with_seats_by_schedule(schedule_id).await?;
        Ok(bookings.into_iter().map(to_response).collect())
    }

    pub async fn get_seat_log(&self, booking_id: Uuid) -> AppResult<SeatLogResponse> {
        let log = self
            .seat_logs
            .find_by_booking_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Seat log for booking", &booking_id.to_string()))?;

        Ok(log.into())
    }

    /// Searches schedules by origin, destination and travel date.
    pub async fn search(&self, request: SearchBusRequest) -> AppResult<Vec<BusSearchResult>> {
        let rows = self
            .schedules
            .search(request.origin.trim(), request.destination.trim(), request.travel_date)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| BusSearchResult {
                schedule_id: row.schedule_id,
                bus_id: row.bus_id,
                route_id: row.route_id,
                bus_name: row.bus_name,
                origin: row.origin,
                destination: row.destination,
                departure_time: row.departure_time,
                arrival_time: row.arrival_time,
                fare: row.fare,
                travel_date: row.travel_date,
                available_seats: row.available_seats,
            })
            .collect())
    }

    /// Fire-and-forget notification record; failure is logged and never
    /// affects the committed booking.
    fn notify(&self, user_id: Uuid, message: String, notification_type: &'static str) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let notifier = NotificationService::new(pool);
            if let Err(e) = notifier.record(user_id, &message, notification_type).await {
                tracing::warn!("Failed to record notification for user {}: {}", user_id, e);
            }
        });
    }
}

fn to_response(booking: BookingWithSeats) -> BookingResponse {
    let reserved_seats = booking
        .seats
        .map(|s| s.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    BookingResponse {
        booking_id: booking.id,
        user_id: booking.user_id,
        schedule_id: booking.schedule_id,
        reserved_seats,
        total_fare: booking.total_fare,
        status: booking.status,
        booking_date: booking.booking_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_total_fare_is_fare_times_seat_count() {
        let fare = Decimal::new(10000, 2); // 100.00
        let total = fare * Decimal::from(3u64);
        assert_eq!(total, Decimal::new(30000, 2));
    }

    #[test]
    fn test_to_response_splits_seat_list() {
        let booking = BookingWithSeats {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            schedule_id: Uuid::new_v4(),
            total_fare: Decimal::new(20000, 2),
            status: "confirmed".to_string(),
            booking_date: Utc::now(),
            seats: Some("A1,A2".to_string()),
        };
        let response = to_response(booking);
        assert_eq!(response.reserved_seats, vec!["A1".to_string(), "A2".to_string()]);
    }

    #[test]
    fn test_to_response_handles_missing_seat_log() {
        let booking = BookingWithSeats {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            schedule_id: Uuid::new_v4(),
            total_fare: Decimal::new(10000, 2),
            status: "confirmed".to_string(),
            booking_date: Utc::now(),
            seats: None,
        };
        assert!(to_response(booking).reserved_seats.is_empty());
    }
}
