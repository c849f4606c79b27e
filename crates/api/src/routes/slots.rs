use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/doctors/:doctor_id/slots",
            post(handlers::slots::generate_slots).get(handlers::slots::list_all_slots),
        )
        .route(
            "/api/doctors/:doctor_id/slots/available",
            get(handlers::slots::list_bookable_slots),
        )
        .route("/api/slots/:slot_id", delete(handlers::slots::delete_slot))
        .route("/api/slots/:slot_id/book", post(handlers::bookings::book_slot))
        .route(
            "/api/slots/:slot_id/release",
            post(handlers::bookings::release_slot),
        )
}
