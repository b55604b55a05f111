//! Business logic. Services own the transaction scopes; the request
//! layer stays thin and maps typed results to status codes.

pub mod booking_service;
pub mod bus_service;
pub mod notification_service;
pub mod schedule_service;
pub mod seat_allocator;
pub mod seat_service;
