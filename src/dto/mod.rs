pub mod booking_dto;
pub mod bus_dto;
pub mod schedule_dto;
pub mod seat_dto;
