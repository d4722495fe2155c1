pub mod booking;
pub mod calendar;
pub mod event_type;
pub mod schedule;
pub mod slot;
pub mod team;
