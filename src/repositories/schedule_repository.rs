//! Schedule lookup and administration.
//!
//! `find_by_id` is the read the booking flow depends on; everything else
//! serves the thin schedule administration surface.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::schedule::Schedule;
use crate::utils::errors::AppResult;

/// Schedule joined with bus and route names for responses.
#[derive(Debug, sqlx::FromRow)]
pub struct ScheduleDetails {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub bus_name: String,
    pub route_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub fare: Decimal,
    pub travel_date: NaiveDate,
}

/// One row of a bus search: schedule, route, bus name and the current
/// available-seat count.
#[derive(Debug, sqlx::FromRow)]
pub struct BusSearchRow {
    pub schedule_id: Uuid,
    pub bus_id: Uuid,
    pub route_id: Uuid,
    pub bus_name: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub fare: Decimal,
    pub travel_date: NaiveDate,
    pub available_seats: i64,
}

const DETAILS_SELECT: &str = r#"
    SELECT s.id, s.bus_id, b.bus_name, s.route_id, r.origin, r.destination,
           s.departure_time, s.arrival_time, s.fare, s.travel_date
    FROM schedules s
    JOIN buses b ON b.id = s.bus_id
    JOIN routes r ON r.id = s.route_id
"#;

pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pure read used by the booking flow to obtain bus and fare.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Schedule>> {
        let schedule = sqlx::query_as::<_, Schedule>("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(schedule)
    }

    pub async fn find_details_by_id(&self, id: Uuid) -> AppResult<Option<ScheduleDetails>> {
        let query = format!("{} WHERE s.id = $1", DETAILS_SELECT);
        let details = sqlx::query_as::<_, ScheduleDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(details)
    }

    pub async fn list_all(&self) -> AppResult<Vec<ScheduleDetails>> {
        let query = format!("{} ORDER BY s.departure_time", DETAILS_SELECT);
        let schedules = sqlx::query_as::<_, ScheduleDetails>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(schedules)
    }

    pub async fn list_by_route(&self, route_id: Uuid) -> AppResult<Vec<ScheduleDetails>> {
        let query = format!("{} WHERE s.route_id = $1 ORDER BY s.departure_time", DETAILS_SELECT);
        let schedules = sqlx::query_as::<_, ScheduleDetails>(&query)
            .bind(route_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(schedules)
    }

    pub async fn list_by_bus(&self, bus_id: Uuid) -> AppResult<Vec<ScheduleDetails>> {
        let query = format!("{} WHERE s.bus_id = $1 ORDER BY s.departure_time", DETAILS_SELECT);
        let schedules = sqlx::query_as::<_, ScheduleDetails>(&query)
            .bind(bus_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(schedules)
    }

    /// Searches schedules by origin, destination and travel date,
    /// reporting the live available-seat count per hit.
    pub async fn search(
        &self,
        origin: &str,
        destination: &str,
        travel_date: NaiveDate,
    ) -> AppResult<Vec<BusSearchRow>> {
        let rows = sqlx::query_as::<_, BusSearchRow>(
            r#"
            SELECT s.id AS schedule_id, s.bus_id, s.route_id, b.bus_name,
                   r.origin, r.destination, s.departure_time, s.arrival_time,
                   s.fare, s.travel_date,
                   (SELECT COUNT(*) FROM seats st
                    WHERE st.bus_id = s.bus_id AND st.is_available) AS available_seats
            FROM schedules s
            JOIN buses b ON b.id = s.bus_id
            JOIN routes r ON r.id = s.route_id
            WHERE r.origin = $1 AND r.destination = $2 AND s.travel_date = $3
            ORDER BY s.departure_time
            "#,
        )
        .bind(origin)
        .bind(destination)
        .bind(travel_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create(
        &self,
        bus_id: Uuid,
        route_id: Uuid,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        fare: Decimal,
        travel_date: NaiveDate,
    ) -> AppResult<Schedule> {
        let schedule = sqlx::query_as::<_, Schedule>(
            r#"
            INSERT INTO schedules (id, bus_id, route_id, departure_time, arrival_time, fare, travel_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(bus_id)
        .bind(route_id)
        .bind(departure_time)
        .bind(arrival_time)
        .bind(fare)
        .bind(travel_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// Explicit update; absent fields keep their current values.
    /// Existing bookings keep the fare locked in at booking time.
    pub async fn update(
        &self,
        id: Uuid,
        bus_id: Option<Uuid>,
        route_id: Option<Uuid>,
        departure_time: Option<DateTime<Utc>>,
        arrival_time: Option<DateTime<Utc>>,
        fare: Option<Decimal>,
        travel_date: Option<NaiveDate>,
    ) -> AppResult<Option<Schedule>> {
        let schedule = sqlx::query_as::<_, Schedule>(
            r#"
            UPDATE schedules
            SET bus_id = COALESCE($2, bus_id),
                route_id = COALESCE($3, route_id),
                departure_time = COALESCE($4, departure_time),
                arrival_time = COALESCE($5, arrival_time),
                fare = COALESCE($6, fare),
                travel_date = COALESCE($7, travel_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bus_id)
        .bind(route_id)
        .bind(departure_time)
        .bind(arrival_time)
        .bind(fare)
        .bind(travel_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Option<Schedule>> {
        let schedule = sqlx::query_as::<_, Schedule>(
            "DELETE FROM schedules WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }
}
