//! Schedule endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::schedule_dto::{CreateScheduleRequest, ScheduleResponse, UpdateScheduleRequest};
use crate::services::schedule_service::ScheduleService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_schedule_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_schedule))
        .route("/", get(list_schedules))
        .route("/:id", get(get_schedule))
        .route("/:id", put(update_schedule))
        .route("/:id", delete(delete_schedule))
        .route("/route/:route_id", get(list_schedules_by_route))
        .route("/bus/:bus_id", get(list_schedules_by_bus))
}

async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> AppResult<(StatusCode, Json<ScheduleResponse>)> {
    request.validate()?;
    let service = ScheduleService::new(state.pool.clone());
    let schedule = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ScheduleResponse>> {
    let service = ScheduleService::new(state.pool.clone());
    let schedule = service.get_by_id(id).await?;
    Ok(Json(schedule))
}

async fn list_schedules(State(state): State<AppState>) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let service = ScheduleService::new(state.pool.clone());
    let schedules = service.list_all().await?;
    Ok(Json(schedules))
}

async fn list_schedules_by_route(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let service = ScheduleService::new(state.pool.clone());
    let schedules = service.list_by_route(route_id).await?;
    Ok(Json(schedules))
}

async fn list_schedules_by_bus(
    State(state): State<AppState>,
    Path(bus_id): Path<Uuid>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let service = ScheduleService::new(state.pool.clone());
    let schedules = service.list_by_bus(bus_id).await?;
    Ok(Json(schedules))
}

async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> AppResult<Json<ScheduleResponse>> {
    request.validate()?;
    let service = ScheduleService::new(state.pool.clone());
    let schedule = service.update(id, request).await?;
    Ok(Json(schedule))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = ScheduleService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Schedule deleted"
    })))
}
