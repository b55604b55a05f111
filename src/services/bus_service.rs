//! Bus registry administration.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::bus_dto::{BusResponse, CreateBusRequest, UpdateBusRequest};
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::seat_repository::SeatRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct BusService {
    buses: BusRepository,
    seats: SeatRepository,
}

impl BusService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            buses: BusRepository::new(pool.clone()),
            seats: SeatRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateBusRequest) -> AppResult<BusResponse> {
        if self.buses.bus_number_exists(&request.bus_number).await? {
            return Err(conflict_error("Bus", "bus_number", &request.bus_number));
        }

        let bus = self
            .buses
            .create(
                &request.bus_number,
                &request.bus_name,
                &request.bus_type,
                request.total_seats,
                request.amenities.as_deref(),
            )
            .await?;

        tracing::info!(bus_id = %bus.id, bus_number = %bus.bus_number, "Bus registered");
        Ok(bus.into())
    }

    pub async fn get_by_id(&self, bus_id: Uuid) -> AppResult<BusResponse> {
        let bus = self
            .buses
            .find_by_id(bus_id)
            .await?
            .ok_or_else(|| not_found_error("Bus", &bus_id.to_string()))?;

        Ok(bus.into())
    }

    pub async fn list_all(&self) -> AppResult<Vec<BusResponse>> {
        let buses = self.buses.list_all().await?;
        Ok(buses.into_iter().map(BusResponse::from).collect())
    }

    pub async fn update(&self, bus_id: Uuid, request: UpdateBusRequest) -> AppResult<BusResponse> {
        let bus = self
            .buses
            .update(
                bus_id,
                request.bus_name.as_deref(),
                request.bus_type.as_deref(),
                request.amenities.as_deref(),
            )
            .await?
            .ok_or_else(|| not_found_error("Bus", &bus_id.to_string()))?;

        Ok(bus.into())
    }

    /// Deleting a bus requires its seating to be torn down first.
    pub async fn delete(&self, bus_id: Uuid) -> AppResult<()> {
        let configured = self.seats.count_for_bus(bus_id).await?;
        if configured > 0 {
            return Err(AppError::Conflict(format!(
                "Bus {} still has {} configured seat(s); tear down seating first",
                bus_id, configured
            )));
        }

        self.buses
            .delete(bus_id)
            .await?
            .ok_or_else(|| not_found_error("Bus", &bus_id.to_string()))?;

        tracing::info!(bus_id = %bus_id, "Bus deleted");
        Ok(())
    }
}
