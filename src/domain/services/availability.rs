use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::domain::models::booking::ExistingInterval;
use crate::domain::models::schedule::{DateOverride, Schedule};
use crate::domain::models::slot::{AvailableSlot, Window};
use crate::domain::services::time::{anchor_local, overlaps};

/// Decision for one calendar date after consulting date overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideOutcome {
    /// The date is fully blocked.
    Unavailable,
    /// Explicit times replace the weekday pattern for this date.
    Windows(NaiveTime, NaiveTime),
    /// No authoritative override; fall back to weekday availability.
    NoOverride,
}

/// At most one override per date is expected; the first match wins. An
/// override that is not marked unavailable but carries no complete time pair
/// has nothing explicit to apply and collapses to `NoOverride`.
pub fn resolve_override(date: NaiveDate, overrides: &[DateOverride]) -> OverrideOutcome {
    let Some(rule) = overrides.iter().find(|o| o.date == date) else {
        return OverrideOutcome::NoOverride;
    };

    if rule.is_unavailable {
        return OverrideOutcome::Unavailable;
    }

    match (rule.start_time, rule.end_time) {
        (Some(start), Some(end)) => OverrideOutcome::Windows(start, end),
        _ => OverrideOutcome::NoOverride,
    }
}

/// Resolves the absolute availability windows for one calendar date.
///
/// Overrides are authoritative. Otherwise every weekday row matching the
/// date's day-of-week in the schedule's timezone contributes one window.
/// Windows from split shifts are returned independently and are not assumed
/// disjoint. Rows with inverted times are skipped, as are edges that fall
/// into a DST gap and cannot be anchored.
pub fn resolve_windows(schedule: &Schedule, tz: Tz, date: NaiveDate) -> Vec<Window> {
    let pairs: Vec<(NaiveTime, NaiveTime)> = match resolve_override(date, &schedule.overrides) {
        OverrideOutcome::Unavailable => return Vec::new(),
        OverrideOutcome::Windows(start, end) => vec![(start, end)],
        OverrideOutcome::NoOverride => {
            let weekday = date.weekday();
            schedule
                .availability
                .iter()
                .filter(|a| a.matches_weekday(weekday))
                .map(|a| (a.start_time, a.end_time))
                .collect()
        }
    };

    let mut windows = Vec::new();
    for (start, end) in pairs {
        if start >= end {
            warn!(
                "Skipping inverted availability window {}-{} on {} (schedule {})",
                start, end, date, schedule.id
            );
            continue;
        }
        match (anchor_local(date, start, tz), anchor_local(date, end, tz)) {
            (Some(win_start), Some(win_end)) if win_start < win_end => {
                windows.push(Window { start: win_start, end: win_end });
            }
            _ => {
                debug!(
                    "Window {}-{} on {} has no valid local anchoring in {}, skipping",
                    start, end, date, tz
                );
            }
        }
    }
    windows
}

/// Whether a candidate `[slot_start, slot_end)` collides with any existing
/// commitment once each commitment is expanded by the event buffers.
/// Buffers apply to existing intervals only, never to the candidate.
pub fn has_conflict(
    slot_start: DateTime<Utc>,
    slot_end: DateTime<Utc>,
    existing: &[ExistingInterval],
    before_buffer_min: i64,
    after_buffer_min: i64,
) -> bool {
    let before = Duration::minutes(before_buffer_min);
    let after = Duration::minutes(after_buffer_min);

    existing
        .iter()
        .any(|iv| overlaps(slot_start, slot_end, iv.start - before, iv.end + after))
}

/// Per-query generation parameters, shared across windows and days.
#[derive(Debug, Clone)]
pub struct SlotParams {
    pub duration_min: i64,
    pub interval_min: i64,
    pub before_buffer_min: i64,
    pub after_buffer_min: i64,
    /// Earliest bookable instant: now + minimum notice.
    pub notice_cutoff: DateTime<Utc>,
    /// Latest offered instant: now + future limit.
    pub future_cutoff: DateTime<Utc>,
    pub attendee_tz: Tz,
}

/// Steps through one window emitting conflict-free candidate slots.
///
/// Candidates below the notice cutoff are skipped but stepping continues;
/// the first candidate past the future cutoff ends the window entirely.
pub fn generate_slots(
    window: Window,
    params: &SlotParams,
    existing: &[ExistingInterval],
) -> Vec<AvailableSlot> {
    let mut slots = Vec::new();
    if params.duration_min <= 0 || params.interval_min <= 0 {
        warn!(
            "Refusing slot generation with duration {}min / interval {}min",
            params.duration_min, params.interval_min
        );
        return slots;
    }

    let duration = Duration::minutes(params.duration_min);
    let step = Duration::minutes(params.interval_min);

    let mut cursor = window.start;
    while cursor + duration <= window.end {
        if cursor > params.future_cutoff {
            break;
        }
        if cursor < params.notice_cutoff {
            cursor += step;
            continue;
        }
        if !has_conflict(
            cursor,
            cursor + duration,
            existing,
            params.before_buffer_min,
            params.after_buffer_min,
        ) {
            slots.push(AvailableSlot {
                time: cursor,
                local_time: cursor
                    .with_timezone(&params.attendee_tz)
                    .format("%H:%M")
                    .to_string(),
                duration_min: params.duration_min,
            });
        }
        cursor += step;
    }
    slots
}
