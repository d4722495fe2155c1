#![allow(dead_code)]

use availability_engine::{
    config::EngineConfig,
    domain::models::{
        booking::{Booking, BookingStatus, ExistingInterval},
        calendar::CalendarCredential,
        event_type::{EventType, SchedulingType},
        schedule::{Availability, DateOverride, Schedule},
        slot::SlotQuery,
        team::{MemberLoad, TeamMember},
    },
    domain::ports::{
        BookingRepository, CalendarCredentialRepository, CalendarProvider, EventTypeRepository,
        ScheduleRepository, TeamRepository,
    },
    error::{EngineError, ProviderError},
    state::EngineState,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Fixed reference instant for deterministic notice / future-limit checks:
/// Tuesday 2026-09-01 12:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap()
}

/// The Monday following `test_now()`.
pub fn next_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// One `start`-`end` window on each listed weekday, in the given zone.
/// Weekdays are 0 = Sunday .. 6 = Saturday.
pub fn weekday_schedule(
    id: &str,
    user_id: &str,
    timezone: &str,
    days: &[u8],
    start: NaiveTime,
    end: NaiveTime,
) -> Schedule {
    Schedule {
        id: id.to_string(),
        user_id: user_id.to_string(),
        timezone: timezone.to_string(),
        availability: days
            .iter()
            .map(|&day_of_week| Availability { day_of_week, start_time: start, end_time: end })
            .collect(),
        overrides: Vec::new(),
    }
}

pub fn business_hours_schedule(id: &str, user_id: &str, timezone: &str) -> Schedule {
    weekday_schedule(id, user_id, timezone, &[1, 2, 3, 4, 5], t(9, 0), t(17, 0))
}

pub fn unavailable_override(date: NaiveDate) -> DateOverride {
    DateOverride { date, start_time: None, end_time: None, is_unavailable: true }
}

pub fn window_override(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> DateOverride {
    DateOverride { date, start_time: Some(start), end_time: Some(end), is_unavailable: false }
}

/// 30-minute personal event type with no buffers, 120 minutes notice and a
/// 60 day horizon, mirroring the common single-host setup.
pub fn base_event_type(id: &str, user_id: &str, schedule_id: &str) -> EventType {
    EventType {
        id: id.to_string(),
        title: "Intro call".to_string(),
        user_id: user_id.to_string(),
        team_id: None,
        schedule_id: Some(schedule_id.to_string()),
        duration_min: 30,
        slot_interval_min: None,
        before_buffer_min: 0,
        after_buffer_min: 0,
        minimum_notice_min: 120,
        future_limit_days: 60,
        max_bookings_per_day: None,
        max_bookings_per_week: None,
        scheduling_type: SchedulingType::Personal,
        is_active: true,
        created_at: test_now() - Duration::days(30),
    }
}

pub fn team_event_type(
    id: &str,
    creator_id: &str,
    team_id: &str,
    schedule_id: &str,
    scheduling_type: SchedulingType,
) -> EventType {
    EventType {
        team_id: Some(team_id.to_string()),
        scheduling_type,
        ..base_event_type(id, creator_id, schedule_id)
    }
}

pub fn live_booking(
    event_type_id: &str,
    user_id: &str,
    start: DateTime<Utc>,
    duration_min: i64,
) -> Booking {
    Booking {
        id: Uuid::new_v4().to_string(),
        event_type_id: event_type_id.to_string(),
        user_id: user_id.to_string(),
        start_time: start,
        end_time: start + Duration::minutes(duration_min),
        status: BookingStatus::Accepted,
        created_at: test_now() - Duration::days(1),
    }
}

pub fn query(event_type_id: &str, date: NaiveDate, timezone: &str) -> SlotQuery {
    SlotQuery {
        event_type_id: event_type_id.to_string(),
        start_date: date,
        end_date: date,
        timezone: timezone.to_string(),
    }
}

pub fn range_query(
    event_type_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    timezone: &str,
) -> SlotQuery {
    SlotQuery {
        event_type_id: event_type_id.to_string(),
        start_date,
        end_date,
        timezone: timezone.to_string(),
    }
}

// ---------------------------------------------------------------------------
// In-memory port implementations
// ---------------------------------------------------------------------------

struct FixtureEventTypeRepo(Vec<EventType>);

#[async_trait]
impl EventTypeRepository for FixtureEventTypeRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<EventType>, EngineError> {
        Ok(self.0.iter().find(|e| e.id == id).cloned())
    }

    async fn find_personal_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<EventType>, EngineError> {
        Ok(self
            .0
            .iter()
            .find(|e| e.user_id == user_id && e.scheduling_type == SchedulingType::Personal)
            .cloned())
    }
}

struct FixtureScheduleRepo(Vec<Schedule>);

#[async_trait]
impl ScheduleRepository for FixtureScheduleRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Schedule>, EngineError> {
        Ok(self.0.iter().find(|s| s.id == id).cloned())
    }

    async fn find_default_for_user(&self, user_id: &str) -> Result<Option<Schedule>, EngineError> {
        Ok(self.0.iter().find(|s| s.user_id == user_id).cloned())
    }
}

struct FixtureBookingRepo(Vec<Booking>);

#[async_trait]
impl BookingRepository for FixtureBookingRepo {
    async fn list_live_for_host(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, EngineError> {
        Ok(self
            .0
            .iter()
            .filter(|b| {
                b.user_id == user_id && b.is_live() && b.start_time < end && b.end_time > start
            })
            .cloned()
            .collect())
    }

    async fn member_loads(
        &self,
        event_type_id: &str,
        user_ids: &[String],
        since: DateTime<Utc>,
    ) -> Result<Vec<MemberLoad>, EngineError> {
        let mut loads: Vec<MemberLoad> = Vec::new();
        for user_id in user_ids {
            let mut live_count = 0;
            let mut last_created_at: Option<DateTime<Utc>> = None;
            for b in &self.0 {
                if b.event_type_id == event_type_id
                    && b.user_id == *user_id
                    && b.is_live()
                    && b.created_at >= since
                {
                    live_count += 1;
                    if last_created_at.is_none_or(|prev| b.created_at > prev) {
                        last_created_at = Some(b.created_at);
                    }
                }
            }
            if live_count > 0 {
                loads.push(MemberLoad { user_id: user_id.clone(), live_count, last_created_at });
            }
        }
        Ok(loads)
    }
}

struct FixtureTeamRepo(Vec<TeamMember>);

#[async_trait]
impl TeamRepository for FixtureTeamRepo {
    async fn list_accepted_members(&self, team_id: &str) -> Result<Vec<TeamMember>, EngineError> {
        Ok(self
            .0
            .iter()
            .filter(|m| m.team_id == team_id && m.accepted)
            .cloned()
            .collect())
    }
}

struct FixtureCredentialRepo(Vec<CalendarCredential>);

#[async_trait]
impl CalendarCredentialRepository for FixtureCredentialRepo {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CalendarCredential>, EngineError> {
        Ok(self.0.iter().filter(|c| c.user_id == user_id).cloned().collect())
    }
}

#[derive(Clone, Copy)]
pub enum ProviderBehavior {
    Succeed,
    FailAuth,
    FailNetwork,
    FailQuota,
}

/// Scripted calendar provider: serves a fixed busy list or fails every
/// call, and counts credential refreshes.
pub struct MockCalendarProvider {
    pub busy: Vec<ExistingInterval>,
    pub behavior: ProviderBehavior,
    pub refresh_count: AtomicUsize,
}

impl MockCalendarProvider {
    pub fn serving(busy: Vec<ExistingInterval>) -> Arc<Self> {
        Arc::new(Self { busy, behavior: ProviderBehavior::Succeed, refresh_count: AtomicUsize::new(0) })
    }

    pub fn failing(behavior: ProviderBehavior) -> Arc<Self> {
        Arc::new(Self { busy: Vec::new(), behavior, refresh_count: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn get_busy_times(
        &self,
        _credential: &CalendarCredential,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExistingInterval>, ProviderError> {
        match self.behavior {
            ProviderBehavior::Succeed => Ok(self
                .busy
                .iter()
                .filter(|iv| iv.start < end && iv.end > start)
                .copied()
                .collect()),
            ProviderBehavior::FailAuth => Err(ProviderError::Auth("token revoked".into())),
            ProviderBehavior::FailNetwork => Err(ProviderError::Network("connection reset".into())),
            ProviderBehavior::FailQuota => Err(ProviderError::Quota("rate limited".into())),
        }
    }

    async fn refresh_credential(
        &self,
        credential: &CalendarCredential,
    ) -> Result<CalendarCredential, ProviderError> {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        let mut refreshed = credential.clone();
        refreshed.expires_at = Some(test_now() + Duration::hours(1));
        Ok(refreshed)
    }
}

pub fn credential(id: &str, user_id: &str, provider: &str) -> CalendarCredential {
    CalendarCredential {
        id: id.to_string(),
        user_id: user_id.to_string(),
        provider: provider.to_string(),
        access_token: "token".to_string(),
        expires_at: Some(test_now() + Duration::hours(12)),
    }
}

/// Everything a test wires into the engine; `state()` freezes it into the
/// dependency handle the services consume.
#[derive(Default)]
pub struct EngineFixture {
    pub event_types: Vec<EventType>,
    pub schedules: Vec<Schedule>,
    pub bookings: Vec<Booking>,
    pub members: Vec<TeamMember>,
    pub credentials: Vec<CalendarCredential>,
    pub providers: HashMap<String, Arc<dyn CalendarProvider>>,
}

impl EngineFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, key: &str, provider: Arc<dyn CalendarProvider>) -> Self {
        self.providers.insert(key.to_string(), provider);
        self
    }

    pub fn state(self) -> Arc<EngineState> {
        Arc::new(EngineState {
            config: EngineConfig::default(),
            event_type_repo: Arc::new(FixtureEventTypeRepo(self.event_types)),
            schedule_repo: Arc::new(FixtureScheduleRepo(self.schedules)),
            booking_repo: Arc::new(FixtureBookingRepo(self.bookings)),
            team_repo: Arc::new(FixtureTeamRepo(self.members)),
            credential_repo: Arc::new(FixtureCredentialRepo(self.credentials)),
            calendar_providers: self.providers,
        })
    }
}
