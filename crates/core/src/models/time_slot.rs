use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One bookable unit of a doctor's calendar.
///
/// `(doctor_id, date, time)` is unique, and `appointment_id` is present
/// exactly when `is_booked` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: i32,
    pub is_booked: bool,
    pub appointment_id: Option<Uuid>,
    pub is_recurring: bool,
    pub last_updated: DateTime<Utc>,
}

/// A slot that passed validation and is ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: i32,
    pub is_recurring: bool,
}

impl NewTimeSlot {
    pub fn unbooked(doctor_id: Uuid, date: NaiveDate, time: NaiveTime, duration: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            date,
            time,
            duration,
            is_recurring: false,
        }
    }

    pub fn into_slot(self, now: DateTime<Utc>) -> TimeSlot {
        TimeSlot {
            id: self.id,
            doctor_id: self.doctor_id,
            date: self.date,
            time: self.time,
            duration: self.duration,
            is_booked: false,
            appointment_id: None,
            is_recurring: self.is_recurring,
            last_updated: now,
        }
    }
}

/// A single `{time, duration}` entry of a generation request, as received.
///
/// Deserializing an entry never fails: a missing or mistyped field becomes
/// `None` and the entry is dropped during planning, so one malformed entry
/// does not reject its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct SlotRequest {
    pub time: Option<String>,
    pub duration: Option<i64>,
}

impl SlotRequest {
    pub fn new(time: impl Into<String>, duration: i64) -> Self {
        Self {
            time: Some(time.into()),
            duration: Some(duration),
        }
    }
}

impl From<Value> for SlotRequest {
    fn from(value: Value) -> Self {
        Self {
            time: value.get("time").and_then(Value::as_str).map(str::to_string),
            duration: value.get("duration").and_then(Value::as_i64),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlotsRequest {
    /// Missing dates are reported as invalid ones.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slots: Vec<SlotRequest>,
    #[serde(default)]
    pub override_existing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlotsResponse {
    /// Records actually inserted by this call.
    pub created: u64,
    /// Entries that survived validation and were submitted for insertion.
    pub requested: usize,
    /// Size of the roster after the call.
    pub total: usize,
    pub roster: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableSlotsResponse {
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub slots: Vec<TimeSlot>,
    pub total: usize,
    pub available_count: usize,
}

/// `?date=YYYY-MM-DD`; a missing date is reported as an invalid one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    pub appointment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlotResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotResponse {
    pub booked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSlotResponse {
    pub released: bool,
}

/// Serializes a `NaiveTime` as 24-hour `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        crate::validation::parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{raw}'")))
    }
}
