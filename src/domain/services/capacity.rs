use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::domain::models::booking::Booking;
use crate::domain::services::time::{day_bounds, iso_week_bounds, overlaps};

fn count_live_overlapping(bookings: &[Booking], start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    bookings
        .iter()
        .filter(|b| b.is_live() && overlaps(b.start_time, b.end_time, start, end))
        .count() as i64
}

/// Whether the daily booking cap is already met for `date`, with day
/// boundaries taken in the attendee's timezone.
pub fn day_cap_reached(
    bookings: &[Booking],
    date: NaiveDate,
    attendee_tz: Tz,
    cap: Option<i64>,
) -> bool {
    let Some(cap) = cap else { return false };
    let Some((day_start, day_end)) = day_bounds(date, attendee_tz) else {
        return false;
    };
    count_live_overlapping(bookings, day_start, day_end) >= cap
}

/// Whether the weekly cap is met for the Mon-Sun ISO week containing
/// `date`. Once true, the caller skips the remainder of that week.
pub fn week_cap_reached(
    bookings: &[Booking],
    date: NaiveDate,
    attendee_tz: Tz,
    cap: Option<i64>,
) -> bool {
    let Some(cap) = cap else { return false };
    let (monday, sunday) = iso_week_bounds(date);
    let (Some((week_start, _)), Some((_, week_end))) =
        (day_bounds(monday, attendee_tz), day_bounds(sunday, attendee_tz))
    else {
        return false;
    };
    count_live_overlapping(bookings, week_start, week_end) >= cap
}
