use std::collections::HashMap;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::ports::{
    BookingRepository, CalendarCredentialRepository, CalendarProvider, EventTypeRepository,
    ScheduleRepository, TeamRepository,
};

/// Dependency-injected data-access handle for the engine. Constructed by the
/// hosting process and passed into the services; the engine holds no
/// module-level singletons or cached clients of its own.
#[derive(Clone)]
pub struct EngineState {
    pub config: EngineConfig,
    pub event_type_repo: Arc<dyn EventTypeRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub team_repo: Arc<dyn TeamRepository>,
    pub credential_repo: Arc<dyn CalendarCredentialRepository>,
    /// Calendar backends keyed by the `provider` field of stored credentials.
    pub calendar_providers: HashMap<String, Arc<dyn CalendarProvider>>,
}
