use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
    Admin,
}

/// A verified caller identity, as produced by the identity verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }

    /// True when the caller is the doctor who owns `doctor_id`'s calendar.
    pub fn owns_calendar(&self, doctor_id: Uuid) -> bool {
        self.is_doctor() && self.id == doctor_id
    }
}
