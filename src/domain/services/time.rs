use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Anchors a wall-clock time on a calendar date in an IANA zone to an
/// absolute UTC instant. DST-ambiguous times resolve to the earlier
/// interpretation; times inside a spring-forward gap do not exist and yield
/// `None`.
pub fn anchor_local(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// The UTC interval covering one local calendar day: local midnight of
/// `date` up to local midnight of the following day. `None` only when a
/// zone transition erases midnight itself.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = anchor_local(date, NaiveTime::MIN, tz)?;
    let end = anchor_local(date.succ_opt()?, NaiveTime::MIN, tz)?;
    Some((start, end))
}

/// Monday and Sunday of the ISO week containing `date`.
pub fn iso_week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}
