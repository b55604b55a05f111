pub mod booking_routes;
pub mod bus_routes;
pub mod schedule_routes;
pub mod seat_routes;
