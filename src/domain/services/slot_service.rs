use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::domain::models::booking::{Booking, ExistingInterval};
use crate::domain::models::event_type::EventType;
use crate::domain::models::schedule::Schedule;
use crate::domain::models::slot::{AvailableSlot, SlotQuery};
use crate::domain::services::availability::{generate_slots, resolve_windows, SlotParams};
use crate::domain::services::busy::BusyTimeAggregator;
use crate::domain::services::capacity::{day_cap_reached, week_cap_reached};
use crate::domain::services::time::{day_bounds, iso_week_bounds};
use crate::error::EngineError;
use crate::state::EngineState;

/// Orchestrates a slot query for a single host: validation, schedule and
/// booking loads, the external busy-time fan-out, then per-day capacity,
/// window resolution and slot generation.
#[derive(Clone)]
pub struct SlotService {
    state: Arc<EngineState>,
}

impl SlotService {
    pub fn new(state: Arc<EngineState>) -> Self {
        Self { state }
    }

    pub async fn query_slots(&self, query: &SlotQuery) -> Result<Vec<AvailableSlot>, EngineError> {
        self.query_slots_at(query, Utc::now()).await
    }

    /// Same as [`query_slots`](Self::query_slots) with an explicit "now",
    /// which keeps notice and future-limit behavior testable.
    pub async fn query_slots_at(
        &self,
        query: &SlotQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailableSlot>, EngineError> {
        let attendee_tz = parse_timezone(&query.timezone)?;
        if query.start_date > query.end_date {
            return Err(EngineError::Validation(
                "start_date must not be after end_date".into(),
            ));
        }

        let Some(event_type) = self
            .state
            .event_type_repo
            .find_by_id(&query.event_type_id)
            .await?
        else {
            debug!("Event type {} not found, returning no slots", query.event_type_id);
            return Ok(Vec::new());
        };
        if !event_type.is_active {
            debug!("Event type {} is inactive, returning no slots", event_type.id);
            return Ok(Vec::new());
        }

        let Some(schedule) = self.resolve_schedule(&event_type).await? else {
            debug!("No schedule resolvable for event type {}", event_type.id);
            return Ok(Vec::new());
        };

        self.slots_for_host(
            &event_type,
            &schedule,
            &event_type.user_id,
            query.start_date,
            query.end_date,
            attendee_tz,
            now,
        )
        .await
    }

    /// The event type's own schedule when it references one, otherwise the
    /// owner's default schedule.
    pub(crate) async fn resolve_schedule(
        &self,
        event_type: &EventType,
    ) -> Result<Option<Schedule>, EngineError> {
        if let Some(schedule_id) = &event_type.schedule_id
            && let Some(schedule) = self.state.schedule_repo.find_by_id(schedule_id).await?
        {
            return Ok(Some(schedule));
        }
        self.state
            .schedule_repo
            .find_default_for_user(&event_type.user_id)
            .await
    }

    /// Core per-host pipeline, shared with the team services which run it
    /// once per member against that member's schedule.
    pub(crate) async fn slots_for_host(
        &self,
        event_type: &EventType,
        schedule: &Schedule,
        host_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        attendee_tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailableSlot>, EngineError> {
        let schedule_tz: Tz = schedule.timezone.parse().map_err(|_| {
            EngineError::Validation(format!(
                "Unsupported schedule timezone: {}",
                schedule.timezone
            ))
        })?;

        // Windows are anchored in the schedule's zone and can precede or
        // trail the attendee-local day by up to a day, so both load ranges
        // carry a one-day skew margin.
        let skew = Duration::days(1);
        let query_start = utc_day_start(start_date, attendee_tz) - skew;
        let query_end = utc_day_end(end_date, attendee_tz) + skew;

        // Bookings are loaded over the enclosing ISO weeks so the weekly cap
        // sees the whole week, padded by the buffers so commitments just
        // outside the range still project blocked zones into it.
        let (load_monday, _) = iso_week_bounds(start_date);
        let (_, load_sunday) = iso_week_bounds(end_date);
        let pad = Duration::minutes(
            event_type.before_buffer_min.max(event_type.after_buffer_min).max(0),
        );
        let bookings = self
            .state
            .booking_repo
            .list_live_for_host(
                host_id,
                utc_day_start(load_monday, attendee_tz) - pad - skew,
                utc_day_end(load_sunday, attendee_tz) + pad + skew,
            )
            .await?;

        // Conflict blocking is host-wide (no two live bookings may overlap
        // for the same host), but the per-day/per-week caps are settings of
        // this event type and count only its own bookings.
        let cap_bookings: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.event_type_id == event_type.id)
            .cloned()
            .collect();

        let aggregator = BusyTimeAggregator::new(self.state.clone());
        let busy = aggregator.busy_times(host_id, query_start, query_end).await?;

        let mut existing: Vec<ExistingInterval> = bookings
            .iter()
            .filter(|b| b.is_live())
            .map(ExistingInterval::from)
            .collect();
        existing.extend(busy);

        let params = SlotParams {
            duration_min: event_type.duration_min,
            interval_min: event_type.slot_interval(),
            before_buffer_min: event_type.before_buffer_min,
            after_buffer_min: event_type.after_buffer_min,
            notice_cutoff: now + Duration::minutes(event_type.minimum_notice_min),
            future_cutoff: now + Duration::days(event_type.future_limit_days),
            attendee_tz,
        };

        let mut slots = Vec::new();
        let mut date = start_date;
        while date <= end_date {
            if week_cap_reached(&cap_bookings, date, attendee_tz, event_type.max_bookings_per_week) {
                debug!(
                    "Weekly booking cap reached in week of {}, skipping to next week",
                    date
                );
                let (_, sunday) = iso_week_bounds(date);
                match sunday.succ_opt() {
                    Some(next) => {
                        date = next;
                        continue;
                    }
                    None => break,
                }
            }

            if day_cap_reached(&cap_bookings, date, attendee_tz, event_type.max_bookings_per_day) {
                debug!("Daily booking cap reached on {}, skipping day", date);
            } else {
                for window in resolve_windows(schedule, schedule_tz, date) {
                    slots.extend(generate_slots(window, &params, &existing));
                }
            }

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        // Split shifts may produce the same instant twice; callers rely on a
        // sorted, duplicate-free result.
        slots.sort_by_key(|s| s.time);
        slots.dedup_by_key(|s| s.time);
        Ok(slots)
    }
}

pub(crate) fn parse_timezone(name: &str) -> Result<Tz, EngineError> {
    name.parse()
        .map_err(|_| EngineError::Validation(format!("Unsupported timezone: {name}")))
}

/// UTC instant of local midnight opening `date`. Falls back to UTC midnight
/// for the rare zones whose transition erases local midnight.
fn utc_day_start(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    day_bounds(date, tz)
        .map(|(start, _)| start)
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

fn utc_day_end(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    day_bounds(date, tz)
        .map(|(_, end)| end)
        .unwrap_or_else(|| {
            Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)) + Duration::days(1)
        })
}
