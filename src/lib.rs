//! NextStop booking backend: seat inventory, schedule lookup, atomic
//! seat allocation, booking ledger and audit log for scheduled bus
//! trips.

pub mod config;
pub mod database;
pub mod dto;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{routing::get, Json, Router};
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn create_app(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors_origins);

    let api = Router::new()
        .nest("/bookings", routes::booking_routes::create_booking_router())
        .nest("/seats", routes::seat_routes::create_seat_router())
        .nest("/schedules", routes::schedule_routes::create_schedule_router())
        .nest("/buses", routes::bus_routes::create_bus_router());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "nextstop-booking",
        "status": "healthy"
    }))
}
