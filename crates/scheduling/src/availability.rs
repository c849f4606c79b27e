use std::sync::Arc;

use docslot_core::{errors::SlotResult, models::time_slot::TimeSlot, validation::parse_date};
use docslot_db::store::SlotStore;
use uuid::Uuid;

/// Every slot of a doctor's date, booked or not.
#[derive(Debug, Clone)]
pub struct Roster {
    pub slots: Vec<TimeSlot>,
    pub total: usize,
    pub available_count: usize,
}

pub struct AvailabilityResolver {
    store: Arc<dyn SlotStore>,
}

impl AvailabilityResolver {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Unbooked slots for the doctor on `date`, earliest first.
    pub async fn list_bookable(&self, doctor_id: Uuid, date: &str) -> SlotResult<Vec<TimeSlot>> {
        let date = parse_date(date)?;
        let mut slots = self.store.find_by_doctor_and_date(doctor_id, date).await?;
        slots.retain(|slot| !slot.is_booked);
        slots.sort_by_key(|slot| slot.time);
        Ok(slots)
    }

    pub async fn list_all(&self, doctor_id: Uuid, date: &str) -> SlotResult<Roster> {
        let date = parse_date(date)?;
        let mut slots = self.store.find_by_doctor_and_date(doctor_id, date).await?;
        slots.sort_by_key(|slot| slot.time);

        let available_count = slots.iter().filter(|slot| !slot.is_booked).count();

        Ok(Roster {
            total: slots.len(),
            available_count,
            slots,
        })
    }
}
