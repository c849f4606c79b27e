//! Booking state transitions, called when an appointment is created or
//! cancelled.

use axum::{Json, extract::State};
use docslot_core::models::time_slot::{BookSlotRequest, BookSlotResponse, ReleaseSlotResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    extractors::{AppJson, AppPath},
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    AppPath(slot_id): AppPath<Uuid>,
    AppJson(payload): AppJson<BookSlotRequest>,
) -> Result<Json<BookSlotResponse>, AppError> {
    let response = state.service.book(slot_id, payload.appointment_id).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn release_slot(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    AppPath(slot_id): AppPath<Uuid>,
) -> Result<Json<ReleaseSlotResponse>, AppError> {
    let response = state.service.release(slot_id).await?;

    Ok(Json(response))
}
