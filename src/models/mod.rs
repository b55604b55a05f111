pub mod booking;
pub mod bus;
pub mod notification;
pub mod schedule;
pub mod seat;
pub mod seat_log;
