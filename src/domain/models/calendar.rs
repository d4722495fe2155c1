use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access credential for one connected external calendar account.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalendarCredential {
    pub id: String,
    pub user_id: String,
    /// Registry key of the provider this credential belongs to.
    pub provider: String,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CalendarCredential {
    /// Whether the access token expires within `margin_min` of `now` and
    /// should be refreshed before use.
    pub fn needs_refresh(&self, now: DateTime<Utc>, margin_min: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + Duration::minutes(margin_min),
            None => false,
        }
    }
}
