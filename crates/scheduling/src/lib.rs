//! # DocSlot Scheduling
//!
//! Slot generation, availability queries and the booking guard, composed
//! behind [`service::SchedulingService`].
//!
//! - [`generator`]: turns a batch request into validated, conflict-free slots
//! - [`availability`]: read-only bookable/roster views
//! - [`guard`]: atomic booking transitions and booked-slot protection
//! - [`service`]: authorization and orchestration of the above

pub mod availability;
pub mod generator;
pub mod guard;
pub mod service;
