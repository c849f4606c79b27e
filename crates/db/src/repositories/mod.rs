pub mod doctor;
pub mod time_slot;
