use std::{collections::HashSet, sync::Arc};

use chrono::{NaiveDate, NaiveTime};
use docslot_core::{
    errors::{SlotError, SlotResult},
    models::time_slot::{NewTimeSlot, SlotRequest, TimeSlot},
    validation::{MAX_SLOTS_PER_REQUEST, parse_date, parse_duration, parse_time},
};
use docslot_db::store::SlotStore;
use tracing::{debug, info};
use uuid::Uuid;

/// Result of one generation call.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Slots actually inserted.
    pub created: u64,
    /// Slots that survived filtering and were submitted.
    pub requested: usize,
    /// Full roster for the doctor and date after the call.
    pub roster: Vec<TimeSlot>,
}

/// A validated generation request, ready to be written.
#[derive(Debug, Clone)]
pub struct SlotPlan {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<NewTimeSlot>,
    pub override_existing: bool,
}

pub struct SlotGenerator {
    store: Arc<dyn SlotStore>,
}

impl SlotGenerator {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Validates a batch request and persists the surviving slots.
    pub async fn generate(
        &self,
        doctor_id: Uuid,
        date: &str,
        requests: &[SlotRequest],
        override_existing: bool,
    ) -> SlotResult<GenerationOutcome> {
        let plan = self
            .prepare(doctor_id, date, requests, override_existing)
            .await?;
        self.apply(plan).await
    }

    /// Runs every check of a generation request without writing anything.
    ///
    /// Booked times are read here so they can be excluded; a request that
    /// ends in an error leaves the calendar untouched.
    pub async fn prepare(
        &self,
        doctor_id: Uuid,
        date: &str,
        requests: &[SlotRequest],
        override_existing: bool,
    ) -> SlotResult<SlotPlan> {
        let date = parse_date(date)?;

        if requests.is_empty() {
            return Err(SlotError::InvalidSlots(
                "at least one slot must be requested".to_string(),
            ));
        }
        if requests.len() > MAX_SLOTS_PER_REQUEST {
            return Err(SlotError::InvalidSlots(format!(
                "at most {} slots may be requested at once, got {}",
                MAX_SLOTS_PER_REQUEST,
                requests.len()
            )));
        }

        let existing = self.store.find_by_doctor_and_date(doctor_id, date).await?;
        let booked_times: HashSet<NaiveTime> = existing
            .iter()
            .filter(|slot| slot.is_booked)
            .map(|slot| slot.time)
            .collect();

        let slots = plan_slots(doctor_id, date, requests, &booked_times);
        if slots.is_empty() {
            return Err(SlotError::NoValidSlots(format!(
                "none of the {} requested slots for {} are valid and unbooked",
                requests.len(),
                date
            )));
        }

        Ok(SlotPlan {
            doctor_id,
            date,
            slots,
            override_existing,
        })
    }

    /// Writes a prepared plan. With `override_existing`, the unbooked slots
    /// for the date are replaced in one atomic store call; booked slots are
    /// never removed and their times are never re-created.
    pub async fn apply(&self, plan: SlotPlan) -> SlotResult<GenerationOutcome> {
        let SlotPlan {
            doctor_id,
            date,
            slots,
            override_existing,
        } = plan;

        let created = if override_existing {
            self.store.replace_unbooked(doctor_id, date, &slots).await?
        } else {
            self.store.insert_many(&slots).await?
        };
        if created < slots.len() as u64 {
            debug!(
                "Skipped {} slots that already exist for doctor {} on {}",
                slots.len() as u64 - created,
                doctor_id,
                date
            );
        }

        let roster = self.store.find_by_doctor_and_date(doctor_id, date).await?;

        info!(
            "Generated {} slots for doctor {} on {} (roster now {})",
            created,
            doctor_id,
            date,
            roster.len()
        );

        Ok(GenerationOutcome {
            created,
            requested: slots.len(),
            roster,
        })
    }
}

/// Filters raw requests down to the slots that should be inserted.
///
/// Drops entries that lack a field, whose time collides with a booked slot
/// or is not 24-hour `HH:MM`, or whose duration is under the minimum. Repeated times
/// keep their first occurrence. The output preserves request order.
pub fn plan_slots(
    doctor_id: Uuid,
    date: NaiveDate,
    requests: &[SlotRequest],
    booked_times: &HashSet<NaiveTime>,
) -> Vec<NewTimeSlot> {
    let mut seen = HashSet::new();
    let mut planned = Vec::with_capacity(requests.len());

    for request in requests {
        let Some(raw_time) = request.time.as_deref() else {
            debug!("Dropping slot without a time");
            continue;
        };
        let Some(time) = parse_time(raw_time.trim()) else {
            debug!("Dropping slot with invalid time '{}'", raw_time);
            continue;
        };
        if booked_times.contains(&time) {
            debug!("Dropping slot at {} on {}: already booked", raw_time, date);
            continue;
        }
        let Some(duration) = request.duration.and_then(parse_duration) else {
            debug!(
                "Dropping slot at {} with invalid duration {:?}",
                raw_time, request.duration
            );
            continue;
        };
        if !seen.insert(time) {
            continue;
        }

        planned.push(NewTimeSlot::unbooked(doctor_id, date, time, duration));
    }

    planned
}
