//! Booking endpoints. Handlers validate the payload, delegate to the
//! booking service and map typed results to status codes; cancellation
//! deliberately returns a generic message whether the booking is absent
//! or already cancelled.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{
    BookTicketRequest, BookingResponse, BusSearchResult, SearchBusRequest, SeatLogResponse,
};
use crate::models::notification::Notification;
use crate::services::booking_service::BookingService;
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(book_ticket))
        .route("/search", post(search_buses))
        .route("/:id", get(get_booking))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/seat-log", get(get_seat_log))
        .route("/user/:user_id", get(list_bookings_by_user))
        .route("/user/:user_id/notifications", get(list_notifications_by_user))
        .route("/schedule/:schedule_id", get(list_bookings_by_schedule))
}

async fn book_ticket(
    State(state): State<AppState>,
    Json(request): Json<BookTicketRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    request.validate()?;
    let service = BookingService::new(state.pool.clone());
    let booking = service.book(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn search_buses(
    State(state): State<AppState>,
    Json(request): Json<SearchBusRequest>,
) -> AppResult<Json<Vec<BusSearchResult>>> {
    request.validate()?;
    let service = BookingService::new(state.pool.clone());
    let results = service.search(request).await?;
    Ok(Json(results))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let service = BookingService::new(state.pool.clone());
    let booking = service.get_by_booking_id(id).await?;
    Ok(Json(booking))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = BookingService::new(state.pool.clone());
    if service.cancel(id).await? {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Booking cancelled"
        })))
    } else {
        Err(AppError::NotFound("Booking not found or already cancelled".to_string()))
    }
}

async fn get_seat_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SeatLogResponse>> {
    let service = BookingService::new(state.pool.clone());
    let log = service.get_seat_log(id).await?;
    Ok(Json(log))
}

async fn list_bookings_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let service = BookingService::new(state.pool.clone());
    let bookings = service.list_by_user(user_id).await?;
    Ok(Json(bookings))
}

async fn list_notifications_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Notification>>> {
    let service = NotificationService::new(state.pool.clone());
    let notifications = service.list_for_user(user_id).await?;
    Ok(Json(notifications))
}

async fn list_bookings_by_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let service = BookingService::new(state.pool.clone());
    let bookings = service.list_by_schedule(schedule_id).await?;
    Ok(Json(bookings))
}
