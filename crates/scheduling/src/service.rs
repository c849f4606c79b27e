use std::{future::Future, sync::Arc};

use docslot_core::{
    errors::{SlotError, SlotResult},
    models::{
        caller::Caller,
        time_slot::{
            BookSlotResponse, BookableSlotsResponse, DeleteSlotResponse, GenerateSlotsRequest,
            GenerateSlotsResponse, ReleaseSlotResponse, RosterResponse,
        },
    },
    validation::parse_date,
};
use docslot_db::store::{DoctorDirectory, SlotStore};
use tracing::warn;
use uuid::Uuid;

use crate::{availability::AvailabilityResolver, generator::SlotGenerator, guard::BookingGuard};

/// Entry point for every scheduling operation.
///
/// Authorization runs before any storage access; the remaining work is
/// delegated to the generator, resolver and guard.
pub struct SchedulingService {
    doctors: Arc<dyn DoctorDirectory>,
    generator: SlotGenerator,
    resolver: AvailabilityResolver,
    guard: BookingGuard,
}

impl SchedulingService {
    pub fn new(slots: Arc<dyn SlotStore>, doctors: Arc<dyn DoctorDirectory>) -> Self {
        Self {
            doctors,
            generator: SlotGenerator::new(slots.clone()),
            resolver: AvailabilityResolver::new(slots.clone()),
            guard: BookingGuard::new(slots),
        }
    }

    /// Records a doctor the first time they authenticate.
    pub async fn register_caller(&self, caller: &Caller) -> SlotResult<()> {
        if caller.is_doctor() {
            self.doctors.ensure_doctor(caller.id).await?;
        }
        Ok(())
    }

    pub async fn generate_slots(
        &self,
        caller: &Caller,
        doctor_id: Uuid,
        request: &GenerateSlotsRequest,
    ) -> SlotResult<GenerateSlotsResponse> {
        require_owner(caller, doctor_id)?;

        let plan = self
            .generator
            .prepare(
                doctor_id,
                &request.date,
                &request.slots,
                request.override_existing,
            )
            .await?;
        self.doctors.ensure_doctor(doctor_id).await?;
        let outcome = self.generator.apply(plan).await?;

        Ok(GenerateSlotsResponse {
            created: outcome.created,
            requested: outcome.requested,
            total: outcome.roster.len(),
            roster: outcome.roster,
        })
    }

    pub async fn list_bookable(
        &self,
        doctor_id: Uuid,
        date: &str,
    ) -> SlotResult<BookableSlotsResponse> {
        parse_date(date)?;
        if self.doctors.find_doctor(doctor_id).await?.is_none() {
            return Err(SlotError::DoctorNotFound(format!(
                "Doctor {} not found",
                doctor_id
            )));
        }

        let slots = self.resolver.list_bookable(doctor_id, date).await?;
        Ok(BookableSlotsResponse { slots })
    }

    pub async fn list_all(
        &self,
        caller: &Caller,
        doctor_id: Uuid,
        date: &str,
    ) -> SlotResult<RosterResponse> {
        require_owner(caller, doctor_id)?;

        let roster = self.resolver.list_all(doctor_id, date).await?;
        Ok(RosterResponse {
            slots: roster.slots,
            total: roster.total,
            available_count: roster.available_count,
        })
    }

    pub async fn delete_slot(&self, caller: &Caller, slot_id: Uuid) -> SlotResult<DeleteSlotResponse> {
        if !caller.is_doctor() {
            return Err(SlotError::Unauthorized(
                "Only doctors can delete slots".to_string(),
            ));
        }

        self.guard.delete(slot_id, caller.id).await?;
        Ok(DeleteSlotResponse { deleted: true })
    }

    pub async fn book(&self, slot_id: Uuid, appointment_id: Uuid) -> SlotResult<BookSlotResponse> {
        retry_once("book", |_| self.guard.book(slot_id, appointment_id)).await?;
        Ok(BookSlotResponse { booked: true })
    }

    pub async fn release(&self, slot_id: Uuid) -> SlotResult<ReleaseSlotResponse> {
        let guard = &self.guard;
        retry_once("release", move |retrying| async move {
            if retrying {
                guard.retry_release(slot_id).await
            } else {
                guard.release(slot_id).await
            }
        })
        .await?;
        Ok(ReleaseSlotResponse { released: true })
    }
}

fn require_owner(caller: &Caller, doctor_id: Uuid) -> SlotResult<()> {
    if caller.owns_calendar(doctor_id) {
        Ok(())
    } else {
        Err(SlotError::Unauthorized(format!(
            "Caller {} may not manage the calendar of doctor {}",
            caller.id, doctor_id
        )))
    }
}

/// Runs `attempt` again once if it failed with a transient storage error.
///
/// The flag passed to `attempt` is true on the retry, when the first
/// attempt may have committed unseen.
async fn retry_once<T, F, Fut>(operation: &str, mut attempt: F) -> SlotResult<T>
where
    F: FnMut(bool) -> Fut,
    Fut: Future<Output = SlotResult<T>>,
{
    match attempt(false).await {
        Err(err) if err.is_retryable() => {
            warn!("{} failed transiently, retrying once: {}", operation, err);
            attempt(true).await
        }
        result => result,
    }
}
