use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulingType {
    Personal,
    RoundRobin,
    Collective,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventType {
    pub id: String,
    pub title: String,
    /// Owning host. For team event types this is the creator, whose schedule
    /// serves as the fallback for members without one of their own.
    pub user_id: String,
    pub team_id: Option<String>,
    pub schedule_id: Option<String>,
    pub duration_min: i64,
    /// Step between candidate slot starts. `None` falls back to the duration.
    pub slot_interval_min: Option<i64>,
    pub before_buffer_min: i64,
    pub after_buffer_min: i64,
    pub minimum_notice_min: i64,
    pub future_limit_days: i64,
    pub max_bookings_per_day: Option<i64>,
    pub max_bookings_per_week: Option<i64>,
    pub scheduling_type: SchedulingType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl EventType {
    pub fn slot_interval(&self) -> i64 {
        self.slot_interval_min.unwrap_or(self.duration_min)
    }
}
