use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use docslot_core::models::{doctor::Doctor, time_slot::TimeSlot};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    pub duration_minutes: i32,
    pub is_booked: bool,
    pub appointment_id: Option<Uuid>,
    pub is_recurring: bool,
    pub last_updated: DateTime<Utc>,
}

impl From<DbDoctor> for Doctor {
    fn from(row: DbDoctor) -> Self {
        Doctor {
            id: row.id,
            created_at: row.created_at,
        }
    }
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            id: row.id,
            doctor_id: row.doctor_id,
            date: row.slot_date,
            time: row.slot_time,
            duration: row.duration_minutes,
            is_booked: row.is_booked,
            appointment_id: row.appointment_id,
            is_recurring: row.is_recurring,
            last_updated: row.last_updated,
        }
    }
}
