use async_trait::async_trait;
use chrono::NaiveDate;
use docslot_core::{
    errors::SlotResult,
    models::{
        doctor::Doctor,
        time_slot::{NewTimeSlot, TimeSlot},
    },
};
use mockall::mock;
use uuid::Uuid;

use crate::store::{DoctorDirectory, SlotStore};

// Mock stores for testing failure paths
mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn find_by_doctor_and_date(
            &self,
            doctor_id: Uuid,
            date: NaiveDate,
        ) -> SlotResult<Vec<TimeSlot>>;

        async fn find_by_id(&self, id: Uuid) -> SlotResult<Option<TimeSlot>>;

        async fn insert_many(&self, slots: &[NewTimeSlot]) -> SlotResult<u64>;

        async fn delete_by_id(&self, id: Uuid) -> SlotResult<bool>;

        async fn replace_unbooked(
            &self,
            doctor_id: Uuid,
            date: NaiveDate,
            slots: &[NewTimeSlot],
        ) -> SlotResult<u64>;

        async fn update_booking_state(
            &self,
            id: Uuid,
            booked: bool,
            appointment_id: Option<Uuid>,
        ) -> SlotResult<Option<TimeSlot>>;
    }
}

mock! {
    pub DoctorDirectory {}

    #[async_trait]
    impl DoctorDirectory for DoctorDirectory {
        async fn find_doctor(&self, id: Uuid) -> SlotResult<Option<Doctor>>;

        async fn ensure_doctor(&self, id: Uuid) -> SlotResult<Doctor>;
    }
}
