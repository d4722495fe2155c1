pub mod availability;
pub mod busy;
pub mod capacity;
pub mod slot_service;
pub mod team_service;
pub mod time;
