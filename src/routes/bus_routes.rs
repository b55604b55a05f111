//! Bus registry endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::bus_dto::{BusResponse, CreateBusRequest, UpdateBusRequest};
use crate::services::bus_service::BusService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_bus_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_bus))
        .route("/", get(list_buses))
        .route("/:id", get(get_bus))
        .route("/:id", put(update_bus))
        .route("/:id", delete(delete_bus))
}

async fn create_bus(
    State(state): State<AppState>,
    Json(request): Json<CreateBusRequest>,
) -> AppResult<(StatusCode, Json<BusResponse>)> {
    request.validate()?;
    let service = BusService::new(state.pool.clone());
    let bus = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(bus)))
}

async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BusResponse>> {
    let service = BusService::new(state.pool.clone());
    let bus = service.get_by_id(id).await?;
    Ok(Json(bus))
}

async fn list_buses(State(state): State<AppState>) -> AppResult<Json<Vec<BusResponse>>> {
    let service = BusService::new(state.pool.clone());
    let buses = service.list_all().await?;
    Ok(Json(buses))
}

async fn update_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBusRequest>,
) -> AppResult<Json<BusResponse>> {
    request.validate()?;
    let service = BusService::new(state.pool.clone());
    let bus = service.update(id, request).await?;
    Ok(Json(bus))
}

async fn delete_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = BusService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Bus deleted"
    })))
}
