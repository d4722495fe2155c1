use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One bookable instant, as returned to the attendee-facing query layer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AvailableSlot {
    /// Absolute instant, RFC 3339 on the wire.
    pub time: DateTime<Utc>,
    /// The same instant rendered as "HH:mm" in the attendee's timezone.
    #[serde(rename = "localTime")]
    pub local_time: String,
    /// Minutes.
    #[serde(rename = "duration")]
    pub duration_min: i64,
}

/// A slot query as received from the API layer. Dates are attendee-local
/// calendar dates, both inclusive.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    pub event_type_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub timezone: String,
}

/// An absolute availability window before conflict filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
