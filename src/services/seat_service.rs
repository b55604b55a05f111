//! Seat inventory administration: bulk configuration, per-seat reads
//! and updates, teardown, and the administrative bulk release.
//!
//! Seat rows are created when a bus's seating is configured and live
//! for the bus's lifetime; bookings never create or delete them.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::seat_dto::{CreateSeatsRequest, SeatResponse, UpdateSeatRequest};
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::seat_repository::SeatRepository;
use crate::services::seat_allocator::SeatAllocator;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::normalize_seat_labels;

pub struct SeatService {
    pool: PgPool,
    seats: SeatRepository,
    buses: BusRepository,
    allocator: SeatAllocator,
}

impl SeatService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            seats: SeatRepository::new(pool.clone()),
            buses: BusRepository::new(pool.clone()),
            allocator: SeatAllocator::new(pool.clone()),
            pool,
        }
    }

    /// Bulk-creates seats for a bus. The configured seat count must not
    /// exceed the bus's declared capacity; duplicate labels are a
    /// Conflict (enforced by the unique constraint as a backstop).
    pub async fn create_seats(&self, request: CreateSeatsRequest) -> AppResult<Vec<SeatResponse>> {
        let seat_numbers = normalize_seat_labels(&request.seat_numbers)?;

        let bus = self
            .buses
            .find_by_id(request.bus_id)
            .await?
            .ok_or_else(|| not_found_error("Bus", &request.bus_id.to_string()))?;

        let existing = self.seats.count_for_bus(bus.id).await?;
        let requested = seat_numbers.len() as i64;
        if existing + requested > bus.total_seats as i64 {
            return Err(AppError::BadRequest(format!(
                "Configuring {} seat(s) would exceed the bus capacity of {} ({} already configured)",
                requested, bus.total_seats, existing
            )));
        }

        let seats = self.seats.create_for_bus(bus.id, &seat_numbers).await?;
        tracing::info!(bus_id = %bus.id, count = seats.len(), "Seats configured");
        Ok(seats.into_iter().map(SeatResponse::from).collect())
    }

    pub async fn get_seat(&self, seat_id: Uuid) -> AppResult<SeatResponse> {
        let seat = self
            .seats
            .find_by_id(seat_id)
            .await?
            .ok_or_else(|| not_found_error("Seat", &seat_id.to_string()))?;

        Ok(seat.into())
    }

    pub async fn list_by_bus(&self, bus_id: Uuid) -> AppResult<Vec<SeatResponse>> {
        let seats = self.seats.find_by_bus(bus_id).await?;
        Ok(seats.into_iter().map(SeatResponse::from).collect())
    }

    pub async fn list_available_by_bus(&self, bus_id: Uuid) -> AppResult<Vec<SeatResponse>> {
        let seats = self.seats.find_available_by_bus(bus_id).await?;
        Ok(seats.into_iter().map(SeatResponse::from).collect())
    }

    pub async fn update_seat(
        &self,
        bus_id: Uuid,
        seat_number: &str,
        request: UpdateSeatRequest,
    ) -> AppResult<SeatResponse> {
        let seat = self
            .seats
            .update_seat(
                bus_id,
                seat_number,
                request.seat_number.as_deref(),
                request.is_available,
            )
            .await?
            .ok_or_else(|| not_found_error("Seat", seat_number))?;

        Ok(seat.into())
    }

    pub async fn delete_seat(&self, bus_id: Uuid, seat_number: &str) -> AppResult<SeatResponse> {
        let seat = self
            .seats
            .delete_by_bus_and_number(bus_id, seat_number)
            .await?
            .ok_or_else(|| not_found_error("Seat", seat_number))?;

        Ok(seat.into())
    }

    /// Explicit teardown of a bus's seating.
    pub async fn delete_all_for_bus(&self, bus_id: Uuid) -> AppResult<Vec<SeatResponse>> {
        let seats = self.seats.delete_all_by_bus(bus_id).await?;
        if seats.is_empty() {
            return Err(not_found_error("Seats for bus", &bus_id.to_string()));
        }
        tracing::info!(bus_id = %bus_id, count = seats.len(), "Seats torn down");
        Ok(seats.into_iter().map(SeatResponse::from).collect())
    }

    /// Administrative bulk release of every seat on a bus.
    pub async fn release_all_for_bus(&self, bus_id: Uuid) -> AppResult<Vec<SeatResponse>> {
        let seats = self.seats.release_all_for_bus(bus_id).await?;
        if seats.is_empty() {
            return Err(not_found_error("Seats for bus", &bus_id.to_string()));
        }
        tracing::info!(bus_id = %bus_id, count = seats.len(), "Seats released");
        Ok(seats.into_iter().map(SeatResponse::from).collect())
    }

    /// Administrative release of specific seats. Idempotent: seats that
    /// are already available are left untouched. Returns the number of
    /// seats actually released.
    pub async fn release_seats(&self, bus_id: Uuid, seat_numbers: &[String]) -> AppResult<u64> {
        let seat_numbers = normalize_seat_labels(seat_numbers)?;

        let mut conn = self.pool.acquire().await?;
        let released = self.allocator.release(&mut conn, bus_id, &seat_numbers).await?;
        tracing::info!(bus_id = %bus_id, released, "Seats released");
        Ok(released)
    }
}
