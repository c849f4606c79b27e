//! Booking transitions and booked-slot protection.
//!
//! State changes are delegated to the store's conditional update/delete.
//! Reads happen only after a conditional write has already failed, to
//! explain why; they never decide whether to write.

use std::sync::Arc;

use docslot_core::{
    errors::{SlotError, SlotResult},
    models::time_slot::TimeSlot,
};
use docslot_db::store::SlotStore;
use tracing::{info, warn};
use uuid::Uuid;

pub struct BookingGuard {
    store: Arc<dyn SlotStore>,
}

impl BookingGuard {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Claims an unbooked slot for `appointment_id`.
    ///
    /// Booking again with the same appointment succeeds without changes, so
    /// a retry after an ambiguous failure is safe.
    pub async fn book(&self, slot_id: Uuid, appointment_id: Uuid) -> SlotResult<TimeSlot> {
        if let Some(slot) = self
            .store
            .update_booking_state(slot_id, true, Some(appointment_id))
            .await?
        {
            info!("Slot {} booked for appointment {}", slot_id, appointment_id);
            return Ok(slot);
        }

        match self.store.find_by_id(slot_id).await? {
            None => Err(SlotError::NotFound(format!("Slot {} not found", slot_id))),
            Some(slot) if slot.appointment_id == Some(appointment_id) => Ok(slot),
            Some(_) => {
                warn!(
                    "Booking of slot {} for appointment {} lost to an existing booking",
                    slot_id, appointment_id
                );
                Err(SlotError::AlreadyBooked(format!(
                    "Slot {} is already booked",
                    slot_id
                )))
            }
        }
    }

    /// Returns a booked slot to the unbooked state and clears its appointment.
    pub async fn release(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        self.release_slot(slot_id, false).await
    }

    /// Repeats a release whose earlier attempt may have committed without
    /// the caller seeing it. A slot that is already unbooked counts as
    /// released.
    pub async fn retry_release(&self, slot_id: Uuid) -> SlotResult<TimeSlot> {
        self.release_slot(slot_id, true).await
    }

    async fn release_slot(&self, slot_id: Uuid, retrying: bool) -> SlotResult<TimeSlot> {
        if let Some(slot) = self.store.update_booking_state(slot_id, false, None).await? {
            info!("Slot {} released", slot_id);
            return Ok(slot);
        }

        match self.store.find_by_id(slot_id).await? {
            None => Err(SlotError::NotFound(format!("Slot {} not found", slot_id))),
            Some(slot) if retrying => {
                info!("Slot {} was already released by the earlier attempt", slot_id);
                Ok(slot)
            }
            Some(_) => Err(SlotError::NotBooked(format!(
                "Slot {} is not booked",
                slot_id
            ))),
        }
    }

    /// Permanently removes an unbooked slot owned by `owner_id`.
    pub async fn delete(&self, slot_id: Uuid, owner_id: Uuid) -> SlotResult<()> {
        let slot = self
            .store
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| SlotError::NotFound(format!("Slot {} not found", slot_id)))?;

        if slot.doctor_id != owner_id {
            return Err(SlotError::NotOwner(format!(
                "Slot {} belongs to another doctor",
                slot_id
            )));
        }

        if self.store.delete_by_id(slot_id).await? {
            info!("Slot {} deleted by doctor {}", slot_id, owner_id);
            return Ok(());
        }

        match self.store.find_by_id(slot_id).await? {
            Some(slot) if slot.is_booked => Err(SlotError::SlotBooked(format!(
                "Slot {} is booked; cancel the appointment first",
                slot_id
            ))),
            _ => Err(SlotError::NotFound(format!("Slot {} not found", slot_id))),
        }
    }
}
