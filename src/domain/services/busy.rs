use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::models::booking::ExistingInterval;
use crate::domain::models::calendar::CalendarCredential;
use crate::error::EngineError;
use crate::state::EngineState;

/// Fans out busy-time fetches to every connected external calendar account
/// of a host. Individual account failures (refresh, auth, quota, network,
/// timeout) are logged and dropped; the aggregate never fails because one
/// provider did.
pub struct BusyTimeAggregator {
    state: Arc<EngineState>,
}

impl BusyTimeAggregator {
    pub fn new(state: Arc<EngineState>) -> Self {
        Self { state }
    }

    pub async fn busy_times(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExistingInterval>, EngineError> {
        let credentials = self.state.credential_repo.list_for_user(user_id).await?;
        if credentials.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let fetches = credentials
            .into_iter()
            .map(|cred| self.fetch_account(cred, start, end, now));

        let results = join_all(fetches).await;

        let mut busy = Vec::new();
        for intervals in results.into_iter().flatten() {
            busy.extend(intervals);
        }
        debug!("Aggregated {} external busy intervals for host {}", busy.len(), user_id);
        Ok(busy)
    }

    /// Fetches one account's busy intervals. Returns `None` on any failure
    /// so that the account simply contributes nothing.
    async fn fetch_account(
        &self,
        credential: CalendarCredential,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Vec<ExistingInterval>> {
        let Some(provider) = self.state.calendar_providers.get(&credential.provider) else {
            warn!(
                "No calendar provider registered for '{}' (account {})",
                credential.provider, credential.id
            );
            return None;
        };

        let credential = if credential
            .needs_refresh(now, self.state.config.credential_refresh_margin_min)
        {
            match provider.refresh_credential(&credential).await {
                Ok(refreshed) => refreshed,
                Err(e) => {
                    warn!("Credential refresh failed for account {}: {}", credential.id, e);
                    return None;
                }
            }
        } else {
            credential
        };

        let limit = Duration::from_millis(self.state.config.external_fetch_timeout_ms);
        match tokio::time::timeout(limit, provider.get_busy_times(&credential, start, end)).await {
            Ok(Ok(intervals)) => Some(intervals),
            Ok(Err(e)) => {
                warn!("Busy-time fetch failed for account {}: {}", credential.id, e);
                None
            }
            Err(_) => {
                warn!(
                    "Busy-time fetch timed out after {:?} for account {}",
                    limit, credential.id
                );
                None
            }
        }
    }
}
