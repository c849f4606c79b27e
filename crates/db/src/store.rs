//! Storage contracts for slots and doctors, and their PostgreSQL adapter.
//!
//! Every state transition of `is_booked` and every destructive edit is a
//! single conditional statement at this layer, so callers never need a
//! read-decide-write sequence to keep the booking invariants.

use async_trait::async_trait;
use chrono::NaiveDate;
use docslot_core::{
    errors::{SlotError, SlotResult},
    models::{
        doctor::Doctor,
        time_slot::{NewTimeSlot, TimeSlot},
    },
};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{doctor, time_slot},
};

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// All slots for the doctor on `date`, ordered by time ascending.
    async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> SlotResult<Vec<TimeSlot>>;

    async fn find_by_id(&self, id: Uuid) -> SlotResult<Option<TimeSlot>>;

    /// Inserts the batch as unbooked slots, skipping any record whose
    /// `(doctor, date, time)` already exists. Returns the number inserted.
    async fn insert_many(&self, slots: &[NewTimeSlot]) -> SlotResult<u64>;

    /// Removes the slot if and only if it is unbooked at the moment of the
    /// delete. Returns whether a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> SlotResult<bool>;

    /// Atomically removes every unbooked slot for the doctor on `date` and
    /// inserts `slots` with the same skip-on-duplicate rule as
    /// [`SlotStore::insert_many`]. If any part fails, nothing is changed.
    async fn replace_unbooked(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        slots: &[NewTimeSlot],
    ) -> SlotResult<u64>;

    /// Sets `is_booked = booked` and the appointment reference, but only if
    /// the slot is currently in the opposite state. `None` means the
    /// condition did not hold (or the slot does not exist).
    async fn update_booking_state(
        &self,
        id: Uuid,
        booked: bool,
        appointment_id: Option<Uuid>,
    ) -> SlotResult<Option<TimeSlot>>;
}

#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn find_doctor(&self, id: Uuid) -> SlotResult<Option<Doctor>>;

    /// Idempotently registers the doctor.
    async fn ensure_doctor(&self, id: Uuid) -> SlotResult<Doctor>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Separates transient connectivity failures from everything else.
fn classify(report: eyre::Report) -> SlotError {
    match report.downcast_ref::<sqlx::Error>() {
        Some(
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed,
        ) => {
            tracing::error!("Storage unavailable: {}", report);
            SlotError::Unavailable(report.to_string())
        }
        _ => {
            tracing::error!("Storage error: {:?}", report);
            SlotError::Database(report)
        }
    }
}

#[async_trait]
impl SlotStore for PgStore {
    async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> SlotResult<Vec<TimeSlot>> {
        let rows = time_slot::get_time_slots_by_doctor_and_date(&self.pool, doctor_id, date)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> SlotResult<Option<TimeSlot>> {
        let row = time_slot::get_time_slot_by_id(&self.pool, id)
            .await
            .map_err(classify)?;
        Ok(row.map(TimeSlot::from))
    }

    async fn insert_many(&self, slots: &[NewTimeSlot]) -> SlotResult<u64> {
        time_slot::insert_time_slots(&self.pool, slots)
            .await
            .map_err(classify)
    }

    async fn delete_by_id(&self, id: Uuid) -> SlotResult<bool> {
        time_slot::delete_unbooked_time_slot(&self.pool, id)
            .await
            .map_err(classify)
    }

    async fn replace_unbooked(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        slots: &[NewTimeSlot],
    ) -> SlotResult<u64> {
        time_slot::replace_unbooked_time_slots(&self.pool, doctor_id, date, slots)
            .await
            .map_err(classify)
    }

    async fn update_booking_state(
        &self,
        id: Uuid,
        booked: bool,
        appointment_id: Option<Uuid>,
    ) -> SlotResult<Option<TimeSlot>> {
        let row = time_slot::set_booking_state(&self.pool, id, booked, appointment_id)
            .await
            .map_err(classify)?;
        Ok(row.map(TimeSlot::from))
    }
}

#[async_trait]
impl DoctorDirectory for PgStore {
    async fn find_doctor(&self, id: Uuid) -> SlotResult<Option<Doctor>> {
        let row = doctor::get_doctor_by_id(&self.pool, id)
            .await
            .map_err(classify)?;
        Ok(row.map(Doctor::from))
    }

    async fn ensure_doctor(&self, id: Uuid) -> SlotResult<Doctor> {
        let row = doctor::upsert_doctor(&self.pool, id)
            .await
            .map_err(classify)?;
        Ok(Doctor::from(row))
    }
}
