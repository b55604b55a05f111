//! Seat inventory endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::seat_dto::{CreateSeatsRequest, ReleaseSeatsRequest, SeatResponse, UpdateSeatRequest};
use crate::services::seat_service::SeatService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_seat_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_seats))
        .route("/:seat_id", get(get_seat))
        .route("/bus/:bus_id", get(list_seats_by_bus))
        .route("/bus/:bus_id", delete(delete_all_seats))
        .route("/bus/:bus_id/available", get(list_available_seats))
        .route("/bus/:bus_id/release", post(release_seats))
        .route("/bus/:bus_id/:seat_number", put(update_seat))
        .route("/bus/:bus_id/:seat_number", delete(delete_seat))
}

async fn create_seats(
    State(state): State<AppState>,
    Json(request): Json<CreateSeatsRequest>,
) -> AppResult<(StatusCode, Json<Vec<SeatResponse>>)> {
    request.validate()?;
    let service = SeatService::new(state.pool.clone());
    let seats = service.create_seats(request).await?;
    Ok((StatusCode::CREATED, Json(seats)))
}

async fn get_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<Uuid>,
) -> AppResult<Json<SeatResponse>> {
    let service = SeatService::new(state.pool.clone());
    let seat = service.get_seat(seat_id).await?;
    Ok(Json(seat))
}

async fn list_seats_by_bus(
    State(state): State<AppState>,
    Path(bus_id): Path<Uuid>,
) -> AppResult<Json<Vec<SeatResponse>>> {
    let service = SeatService::new(state.pool.clone());
    let seats = service.list_by_bus(bus_id).await?;
    Ok(Json(seats))
}

async fn list_available_seats(
    State(state): State<AppState>,
    Path(bus_id): Path<Uuid>,
) -> AppResult<Json<Vec<SeatResponse>>> {
    let service = SeatService::new(state.pool.clone());
    let seats = service.list_available_by_bus(bus_id).await?;
    Ok(Json(seats))
}

async fn update_seat(
    State(state): State<AppState>,
    Path((bus_id, seat_number)): Path<(Uuid, String)>,
    Json(request): Json<UpdateSeatRequest>,
) -> AppResult<Json<SeatResponse>> {
    request.validate()?;
    let service = SeatService::new(state.pool.clone());
    let seat = service.update_seat(bus_id, &seat_number, request).await?;
    Ok(Json(seat))
}

async fn delete_seat(
    State(state): State<AppState>,
    Path((bus_id, seat_number)): Path<(Uuid, String)>,
) -> AppResult<Json<SeatResponse>> {
    let service = SeatService::new(state.pool.clone());
    let seat = service.delete_seat(bus_id, &seat_number).await?;
    Ok(Json(seat))
}

async fn delete_all_seats(
    State(state): State<AppState>,
    Path(bus_id): Path<Uuid>,
) -> AppResult<Json<Vec<SeatResponse>>> {
    let service = SeatService::new(state.pool.clone());
    let seats = service.delete_all_for_bus(bus_id).await?;
    Ok(Json(seats))
}

/// Releases specific seats, or every seat on the bus when the request
/// names none.
async fn release_seats(
    State(state): State<AppState>,
    Path(bus_id): Path<Uuid>,
    Json(request): Json<ReleaseSeatsRequest>,
) -> AppResult<Json<serde_json::Value>> {
    request.validate()?;
    let service = SeatService::new(state.pool.clone());
    let released = if request.seat_numbers.is_empty() {
        service.release_all_for_bus(bus_id).await?.len() as u64
    } else {
        service.release_seats(bus_id, &request.seat_numbers).await?
    };
    Ok(Json(serde_json::json!({
        "bus_id": bus_id,
        "released": released
    })))
}
