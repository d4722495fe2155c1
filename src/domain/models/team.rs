use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamMember {
    pub user_id: String,
    pub team_id: String,
    /// Only accepted members participate in round-robin and collective
    /// computation.
    pub accepted: bool,
}

/// Booking load of one member over the assignment look-back window, used to
/// rank round-robin candidates.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MemberLoad {
    pub user_id: String,
    pub live_count: i64,
    /// Creation time of the member's most recent live booking for the event
    /// type. `None` means no prior booking, which sorts first.
    pub last_created_at: Option<DateTime<Utc>>,
}
