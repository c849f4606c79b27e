//! # DocSlot Core
//!
//! Domain types shared by every DocSlot crate: time slots, doctors, the
//! authenticated caller, request/response payloads, input validation and
//! the error taxonomy.

pub mod errors;
pub mod models;
pub mod validation;
