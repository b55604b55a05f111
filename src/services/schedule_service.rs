//! Schedule administration and the read path the booking flow uses.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::schedule_dto::{CreateScheduleRequest, ScheduleResponse, UpdateScheduleRequest};
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::schedule_repository::{ScheduleDetails, ScheduleRepository};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct ScheduleService {
    schedules: ScheduleRepository,
    buses: BusRepository,
}

impl ScheduleService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            schedules: ScheduleRepository::new(pool.clone()),
            buses: BusRepository::new(pool),
        }
    }

    pub async fn get_by_id(&self, schedule_id: Uuid) -> AppResult<ScheduleResponse> {
        let details = self
            .schedules
            .find_details_by_id(schedule_id)
            .await?
            .ok_or_else(|| not_found_error("Schedule", &schedule_id.to_string()))?;

        Ok(to_response(details))
    }

    pub async fn list_all(&self) -> AppResult<Vec<ScheduleResponse>> {
        let schedules = self.schedules.list_all().await?;
        Ok(schedules.into_iter().map(to_response).collect())
    }

    pub async fn list_by_route(&self, route_id: Uuid) -> AppResult<Vec<ScheduleResponse>> {
        let schedules = self.schedules.list_by_route(route_id).await?;
        Ok(schedules.into_iter().map(to_response).collect())
    }

    pub async fn list_by_bus(&self, bus_id: Uuid) -> AppResult<Vec<ScheduleResponse>> {
        let schedules = self.schedules.list_by_bus(bus_id).await?;
        Ok(schedules.into_iter().map(to_response).collect())
    }

    pub async fn create(&self, request: CreateScheduleRequest) -> AppResult<ScheduleResponse> {
        validate_times_and_fare(request.departure_time, request.arrival_time, request.fare)?;

        if self.buses.find_by_id(request.bus_id).await?.is_none() {
            return Err(not_found_error("Bus", &request.bus_id.to_string()));
        }

        let schedule = self
            .schedules
            .create(
                request.bus_id,
                request.route_id,
                request.departure_time,
                request.arrival_time,
                request.fare,
                request.travel_date,
            )
            .await?;

        self.get_by_id(schedule.id).await
    }

    pub async fn update(&self, schedule_id: Uuid, request: UpdateScheduleRequest) -> AppResult<ScheduleResponse> {
        if let Some(fare) = request.fare {
            if fare < Decimal::ZERO {
                return Err(AppError::BadRequest("Fare must not be negative".to_string()));
            }
        }

        let schedule = self
            .schedules
            .update(
                schedule_id,
                request.bus_id,
                request.route_id,
                request.departure_time,
                request.arrival_time,
                request.fare,
                request.travel_date,
            )
            .await?
            .ok_or_else(|| not_found_error("Schedule", &schedule_id.to_string()))?;

        self.get_by_id(schedule.id).await
    }

    pub async fn delete(&self, schedule_id: Uuid) -> AppResult<()> {
        self.schedules
            .delete(schedule_id)
            .await?
            .ok_or_else(|| not_found_error("Schedule", &schedule_id.to_string()))?;

        tracing::info!(schedule_id = %schedule_id, "Schedule deleted");
        Ok(())
    }
}

fn validate_times_and_fare(
    departure: chrono::DateTime<chrono::Utc>,
    arrival: chrono::DateTime<chrono::Utc>,
    fare: Decimal,
) -> AppResult<()> {
    if arrival <= departure {
        return Err(AppError::BadRequest("Arrival time must be after departure time".to_string()));
    }
    if fare < Decimal::ZERO {
        return Err(AppError::BadRequest("Fare must not be negative".to_string()));
    }
    Ok(())
}

fn to_response(details: ScheduleDetails) -> ScheduleResponse {
    ScheduleResponse {
        id: details.id,
        bus_id: details.bus_id,
        bus_name: details.bus_name,
        route_id: details.route_id,
        origin: details.origin,
        destination: details.destination,
        departure_time: details.departure_time,
        arrival_time: details.arrival_time,
        fare: details.fare,
        travel_date: details.travel_date,
    }
}
