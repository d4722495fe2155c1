use std::env;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Upper bound for a single external calendar fetch. A fetch that does
    /// not settle in time is dropped like any other provider failure.
    pub external_fetch_timeout_ms: u64,
    /// Credentials expiring within this margin are refreshed before use.
    pub credential_refresh_margin_min: i64,
    /// Trailing window for the round-robin load ranking.
    pub assignment_window_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            external_fetch_timeout_ms: 5000,
            credential_refresh_margin_min: 5,
            assignment_window_days: 30,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            external_fetch_timeout_ms: env::var("EXTERNAL_FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.external_fetch_timeout_ms),
            credential_refresh_margin_min: env::var("CREDENTIAL_REFRESH_MARGIN_MIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.credential_refresh_margin_min),
            assignment_window_days: env::var("ASSIGNMENT_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.assignment_window_days),
        }
    }
}
