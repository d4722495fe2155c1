use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Rescheduled,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Booking {
    pub id: String,
    pub event_type_id: String,
    /// The assigned host.
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Only live bookings count toward conflicts and caps.
    pub fn is_live(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Accepted)
    }
}

/// Common shape for anything that blocks time: internal live bookings and
/// busy intervals fetched from external calendars. UTC, half-open.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ExistingInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&Booking> for ExistingInterval {
    fn from(b: &Booking) -> Self {
        Self { start: b.start_time, end: b.end_time }
    }
}
