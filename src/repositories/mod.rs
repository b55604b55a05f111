//! Data access layer. Repositories own the SQL; transactional methods
//! take a `&mut PgConnection` so the caller controls the unit of work.

pub mod booking_repository;
pub mod bus_repository;
pub mod notification_repository;
pub mod schedule_repository;
pub mod seat_log_repository;
pub mod seat_repository;
pub mod user_repository;
