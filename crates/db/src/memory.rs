//! In-memory store with the same guarantees as the PostgreSQL adapter.
//!
//! All mutations take the single write lock, which makes uniqueness checks,
//! conditional updates and conditional deletes atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use docslot_core::{
    errors::{SlotError, SlotResult},
    models::{
        doctor::Doctor,
        time_slot::{NewTimeSlot, TimeSlot},
    },
};
use eyre::eyre;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{DoctorDirectory, SlotStore};

#[derive(Default)]
struct Tables {
    slots: HashMap<Uuid, TimeSlot>,
    doctors: HashMap<Uuid, Doctor>,
}

impl Tables {
    fn insert_new(&mut self, slots: &[NewTimeSlot]) -> u64 {
        let now = Utc::now();
        let mut inserted = 0;

        for new_slot in slots {
            let duplicate = self.slots.values().any(|existing| {
                existing.doctor_id == new_slot.doctor_id
                    && existing.date == new_slot.date
                    && existing.time == new_slot.time
            });
            if duplicate || self.slots.contains_key(&new_slot.id) {
                tracing::debug!(
                    "Skipping duplicate slot: doctor={}, date={}, time={}",
                    new_slot.doctor_id,
                    new_slot.date,
                    new_slot.time
                );
                continue;
            }

            self.slots
                .insert(new_slot.id, new_slot.clone().into_slot(now));
            inserted += 1;
        }

        inserted
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored slots across all doctors and dates.
    pub async fn slot_count(&self) -> usize {
        self.tables.read().await.slots.len()
    }
}

#[async_trait]
impl SlotStore for InMemoryStore {
    async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> SlotResult<Vec<TimeSlot>> {
        let tables = self.tables.read().await;
        let mut slots: Vec<TimeSlot> = tables
            .slots
            .values()
            .filter(|slot| slot.doctor_id == doctor_id && slot.date == date)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.time);
        Ok(slots)
    }

    async fn find_by_id(&self, id: Uuid) -> SlotResult<Option<TimeSlot>> {
        Ok(self.tables.read().await.slots.get(&id).cloned())
    }

    async fn insert_many(&self, slots: &[NewTimeSlot]) -> SlotResult<u64> {
        let mut tables = self.tables.write().await;
        Ok(tables.insert_new(slots))
    }

    async fn delete_by_id(&self, id: Uuid) -> SlotResult<bool> {
        let mut tables = self.tables.write().await;
        let removable = tables.slots.get(&id).is_some_and(|slot| !slot.is_booked);
        if removable {
            tables.slots.remove(&id);
        }
        Ok(removable)
    }

    async fn replace_unbooked(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        slots: &[NewTimeSlot],
    ) -> SlotResult<u64> {
        let mut tables = self.tables.write().await;
        tables
            .slots
            .retain(|_, slot| slot.is_booked || slot.doctor_id != doctor_id || slot.date != date);
        Ok(tables.insert_new(slots))
    }

    async fn update_booking_state(
        &self,
        id: Uuid,
        booked: bool,
        appointment_id: Option<Uuid>,
    ) -> SlotResult<Option<TimeSlot>> {
        // Mirrors the booked_has_appointment check constraint.
        if booked != appointment_id.is_some() {
            return Err(SlotError::Database(eyre!(
                "booking state for slot {} violates the appointment invariant",
                id
            )));
        }

        let mut tables = self.tables.write().await;
        match tables.slots.get_mut(&id) {
            Some(slot) if slot.is_booked != booked => {
                slot.is_booked = booked;
                slot.appointment_id = appointment_id;
                slot.last_updated = Utc::now();
                Ok(Some(slot.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryStore {
    async fn find_doctor(&self, id: Uuid) -> SlotResult<Option<Doctor>> {
        Ok(self.tables.read().await.doctors.get(&id).cloned())
    }

    async fn ensure_doctor(&self, id: Uuid) -> SlotResult<Doctor> {
        let mut tables = self.tables.write().await;
        let doctor = tables.doctors.entry(id).or_insert_with(|| Doctor {
            id,
            created_at: Utc::now(),
        });
        Ok(doctor.clone())
    }
}
