use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// One recurring weekly window, interpreted in the owning schedule's
/// timezone. Multiple rows per weekday model split shifts.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Availability {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Availability {
    pub fn matches_weekday(&self, weekday: Weekday) -> bool {
        self.day_of_week == weekday.num_days_from_sunday() as u8
    }
}

/// A host-specified exception for one calendar date. When `is_unavailable`
/// is set the date is fully blocked; otherwise explicit times replace (not
/// supplement) the weekday pattern for that date.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DateOverride {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_unavailable: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Schedule {
    pub id: String,
    pub user_id: String,
    /// IANA zone name, e.g. "America/New_York".
    pub timezone: String,
    pub availability: Vec<Availability>,
    pub overrides: Vec<DateOverride>,
}
