//! Bus registry.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::bus::Bus;
use crate::utils::errors::{is_unique_violation, AppError, AppResult};

pub struct BusRepository {
    pool: PgPool,
}

impl BusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        bus_number: &str,
        bus_name: &str,
        bus_type: &str,
        total_seats: i32,
        amenities: Option<&str>,
    ) -> AppResult<Bus> {
        let bus = sqlx::query_as::<_, Bus>(
            r#"
            INSERT INTO buses (id, bus_number, bus_name, bus_type, total_seats, amenities, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(bus_number)
        .bind(bus_name)
        .bind(bus_type)
        .bind(total_seats)
        .bind(amenities)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Bus with bus_number '{}' already exists", bus_number))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(bus)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bus>> {
        let bus = sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bus)
    }

    pub async fn bus_number_exists(&self, bus_number: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM buses WHERE bus_number = $1)")
                .bind(bus_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Bus>> {
        let buses = sqlx::query_as::<_, Bus>("SELECT * FROM buses ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(buses)
    }

    pub async fn update(
        &self,
        id: Uuid,
        bus_name: Option<&str>,
        bus_type: Option<&str>,
        amenities: Option<&str>,
    ) -> AppResult<Option<Bus>> {
        let bus = sqlx::query_as::<_, Bus>(
            r#"
            UPDATE buses
            SET bus_name = COALESCE($2, bus_name),
                bus_type = COALESCE($3, bus_type),
                amenities = COALESCE($4, amenities)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bus_name)
        .bind(bus_type)
        .bind(amenities)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bus)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Option<Bus>> {
        let bus = sqlx::query_as::<_, Bus>("DELETE FROM buses WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bus)
    }
}
