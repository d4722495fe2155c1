use crate::domain::models::{
    booking::{Booking, ExistingInterval},
    calendar::CalendarCredential,
    event_type::EventType,
    schedule::Schedule,
    team::{MemberLoad, TeamMember},
};
use crate::error::{EngineError, ProviderError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<EventType>, EngineError>;
    /// The member's own personal event type, if they configured one. Used by
    /// the team merger to prefer a member's real schedule over the team
    /// fallback.
    async fn find_personal_for_user(&self, user_id: &str) -> Result<Option<EventType>, EngineError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Schedule>, EngineError>;
    async fn find_default_for_user(&self, user_id: &str) -> Result<Option<Schedule>, EngineError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Live (PENDING or ACCEPTED) bookings of one host overlapping a UTC
    /// range, regardless of event type.
    async fn list_live_for_host(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, EngineError>;

    /// Live-booking counts and most recent creation time per member for one
    /// event type, restricted to bookings created at or after `since`.
    /// Members with no bookings in the window may be omitted.
    async fn member_loads(
        &self,
        event_type_id: &str,
        user_ids: &[String],
        since: DateTime<Utc>,
    ) -> Result<Vec<MemberLoad>, EngineError>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn list_accepted_members(&self, team_id: &str) -> Result<Vec<TeamMember>, EngineError>;
}

#[async_trait]
pub trait CalendarCredentialRepository: Send + Sync {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CalendarCredential>, EngineError>;
}

/// One external calendar backend (Google, CalDAV, ...). Implementations are
/// registered in the engine state under the credential's `provider` key.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn get_busy_times(
        &self,
        credential: &CalendarCredential,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExistingInterval>, ProviderError>;

    async fn refresh_credential(
        &self,
        credential: &CalendarCredential,
    ) -> Result<CalendarCredential, ProviderError>;
}
