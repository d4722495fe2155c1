use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::domain::models::event_type::{EventType, SchedulingType};
use crate::domain::models::schedule::Schedule;
use crate::domain::models::slot::{AvailableSlot, SlotQuery};
use crate::domain::models::team::TeamMember;
use crate::domain::services::slot_service::{parse_timezone, SlotService};
use crate::error::EngineError;
use crate::state::EngineState;

/// Team-level availability: merges per-member slot sets for round-robin and
/// collective event types, and picks the host at booking-commit time.
pub struct TeamService {
    state: Arc<EngineState>,
    slots: SlotService,
}

impl TeamService {
    pub fn new(state: Arc<EngineState>) -> Self {
        Self { slots: SlotService::new(state.clone()), state }
    }

    pub async fn team_slots(&self, query: &SlotQuery) -> Result<Vec<AvailableSlot>, EngineError> {
        self.team_slots_at(query, Utc::now()).await
    }

    pub async fn team_slots_at(
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
            return Ok(Vec::new());
        };
        if !event_type.is_active {
            return Ok(Vec::new());
        }
        if event_type.scheduling_type == SchedulingType::Personal {
            return Err(EngineError::Validation(
                "Event type is not team-scheduled".into(),
            ));
        }

        let members = self.accepted_members(&event_type).await?;
        if members.is_empty() {
            debug!("Team event type {} has no accepted members", event_type.id);
            return Ok(Vec::new());
        }

        let fallback_schedule = self.slots.resolve_schedule(&event_type).await?;
        let sets = try_join_all(members.iter().map(|member| {
            self.member_slot_set(
                &event_type,
                fallback_schedule.as_ref(),
                member,
                query.start_date,
                query.end_date,
                attendee_tz,
                now,
            )
        }))
        .await?;

        Ok(merge_slot_sets(sets, event_type.scheduling_type))
    }

    /// Picks the host for a round-robin booking at commit time: available at
    /// the exact instant, least loaded over the trailing window, then least
    /// recently booked ("coldest member first"), with member id as the final
    /// deterministic tie-break.
    pub async fn select_host(
        &self,
        event_type_id: &str,
        slot_time: DateTime<Utc>,
    ) -> Result<TeamMember, EngineError> {
        self.select_host_at(event_type_id, slot_time, Utc::now()).await
    }

    pub async fn select_host_at(
        &self,
        event_type_id: &str,
        slot_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<TeamMember, EngineError> {
        let event_type = self
            .state
            .event_type_repo
            .find_by_id(event_type_id)
            .await?
            .filter(|et| et.is_active)
            .ok_or_else(|| {
                EngineError::NotFound(format!("Event type {event_type_id} not found"))
            })?;
        if event_type.scheduling_type != SchedulingType::RoundRobin {
            return Err(EngineError::Validation(
                "Host selection only applies to round-robin event types".into(),
            ));
        }

        let members = self.accepted_members(&event_type).await?;
        let fallback_schedule = self.slots.resolve_schedule(&event_type).await?;

        // Recompute availability around the slot's UTC date; one day either
        // side absorbs schedule-timezone skew.
        let date = slot_time.date_naive();
        let start_date = date.pred_opt().unwrap_or(date);
        let end_date = date.succ_opt().unwrap_or(date);

        let mut available = Vec::new();
        for member in members {
            let set = self
                .member_slot_set(
                    &event_type,
                    fallback_schedule.as_ref(),
                    &member,
                    start_date,
                    end_date,
                    chrono_tz::UTC,
                    now,
                )
                .await?;
            if set.iter().any(|s| s.time == slot_time) {
                available.push(member);
            }
        }

        match available.len() {
            0 => Err(EngineError::AssignmentImpossible(format!(
                "No member of event type {event_type_id} is available at {slot_time}"
            ))),
            1 => Ok(available.remove(0)),
            _ => self.rank_members(&event_type, available, now).await,
        }
    }

    async fn rank_members(
        &self,
        event_type: &EventType,
        mut candidates: Vec<TeamMember>,
        now: DateTime<Utc>,
    ) -> Result<TeamMember, EngineError> {
        let user_ids: Vec<String> = candidates.iter().map(|m| m.user_id.clone()).collect();
        let since = now - Duration::days(self.state.config.assignment_window_days);

        let loads = self
            .state
            .booking_repo
            .member_loads(&event_type.id, &user_ids, since)
            .await?;
        let by_user: HashMap<&str, (i64, Option<DateTime<Utc>>)> = loads
            .iter()
            .map(|l| (l.user_id.as_str(), (l.live_count, l.last_created_at)))
            .collect();

        // Members absent from the stats have no live bookings in the window.
        // `Option` ordering puts never-booked members (None) first.
        candidates.sort_by_key(|m| {
            let (count, last) = by_user.get(m.user_id.as_str()).copied().unwrap_or((0, None));
            (count, last, m.user_id.clone())
        });

        let chosen = candidates.remove(0);
        debug!(
            "Round-robin selection for event type {}: assigned {}",
            event_type.id, chosen.user_id
        );
        Ok(chosen)
    }

    async fn accepted_members(
        &self,
        event_type: &EventType,
    ) -> Result<Vec<TeamMember>, EngineError> {
        let team_id = event_type.team_id.as_deref().ok_or_else(|| {
            EngineError::Validation(format!(
                "Event type {} is team-scheduled but has no team",
                event_type.id
            ))
        })?;
        self.state.team_repo.list_accepted_members(team_id).await
    }

    /// One member's slot set under the team event type's configuration.
    ///
    /// Schedule preference: the member's personal event type's schedule,
    /// then the member's default schedule, then the team event type's own
    /// schedule. The last is a documented approximation for members without
    /// any schedule of their own. Members with no resolvable schedule at all
    /// contribute an empty set.
    async fn member_slot_set(
        &self,
        team_event: &EventType,
        fallback: Option<&Schedule>,
        member: &TeamMember,
        start_date: NaiveDate,
        end_date: NaiveDate,
        attendee_tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailableSlot>, EngineError> {
        let own = match self
            .state
            .event_type_repo
            .find_personal_for_user(&member.user_id)
            .await?
        {
            Some(personal) => self.slots.resolve_schedule(&personal).await?,
            None => {
                self.state
                    .schedule_repo
                    .find_default_for_user(&member.user_id)
                    .await?
            }
        };

        let schedule = match own.or_else(|| fallback.cloned()) {
            Some(schedule) => schedule,
            None => {
                warn!(
                    "No schedule resolvable for team member {}, treating as unavailable",
                    member.user_id
                );
                return Ok(Vec::new());
            }
        };

        self.slots
            .slots_for_host(
                team_event,
                &schedule,
                &member.user_id,
                start_date,
                end_date,
                attendee_tz,
                now,
            )
            .await
    }
}

/// Merges per-member slot sets. Round-robin keeps an instant when at least
/// one member is free (union, first representative wins); collective keeps
/// it only when every member is free (intersection). Results are sorted
/// ascending by time.
pub fn merge_slot_sets(
    sets: Vec<Vec<AvailableSlot>>,
    scheduling_type: SchedulingType,
) -> Vec<AvailableSlot> {
    if sets.is_empty() {
        return Vec::new();
    }
    let member_count = sets.len();

    let mut merged: BTreeMap<DateTime<Utc>, (AvailableSlot, usize)> = BTreeMap::new();
    for set in sets {
        let mut seen_last: Option<DateTime<Utc>> = None;
        for slot in set {
            // Guard against duplicate instants within one member's set.
            if seen_last == Some(slot.time) {
                continue;
            }
            seen_last = Some(slot.time);
            merged
                .entry(slot.time)
                .and_modify(|(_, n)| *n += 1)
                .or_insert((slot, 1));
        }
    }

    merged
        .into_values()
        .filter_map(|(slot, n)| match scheduling_type {
            SchedulingType::Collective => (n == member_count).then_some(slot),
            _ => Some(slot),
        })
        .collect()
}
