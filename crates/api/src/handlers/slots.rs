//! # Slot Handlers
//!
//! Doctor-facing calendar management (generate, list, delete) and the
//! public availability query.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use docslot_core::models::time_slot::{
    BookableSlotsResponse, DateQuery, DeleteSlotResponse, GenerateSlotsRequest,
    GenerateSlotsResponse, RosterResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    extractors::{AppJson, AppPath, AppQuery},
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
};

/// Creates slots for one doctor and date.
///
/// ```text
/// POST /api/doctors/:doctor_id/slots
/// {"date": "2024-05-01", "slots": [{"time": "09:00", "duration": 30}], "overrideExisting": false}
/// ```
///
/// Only the owning doctor may call this. Invalid entries and times that are
/// already booked are dropped; if nothing survives the request fails with
/// `NO_VALID_SLOTS`.
#[axum::debug_handler]
pub async fn generate_slots(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    AppPath(doctor_id): AppPath<Uuid>,
    AppJson(payload): AppJson<GenerateSlotsRequest>,
) -> Result<(StatusCode, Json<GenerateSlotsResponse>), AppError> {
    let response = state
        .service
        .generate_slots(&caller, doctor_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Full roster for the owning doctor.
#[axum::debug_handler]
pub async fn list_all_slots(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    AppPath(doctor_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<DateQuery>,
) -> Result<Json<RosterResponse>, AppError> {
    let response = state
        .service
        .list_all(&caller, doctor_id, &query.date)
        .await?;

    Ok(Json(response))
}

/// Unbooked slots, for any authenticated caller.
#[axum::debug_handler]
pub async fn list_bookable_slots(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    AppPath(doctor_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<DateQuery>,
) -> Result<Json<BookableSlotsResponse>, AppError> {
    let response = state.service.list_bookable(doctor_id, &query.date).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    AppPath(slot_id): AppPath<Uuid>,
) -> Result<Json<DeleteSlotResponse>, AppError> {
    let response = state.service.delete_slot(&caller, slot_id).await?;

    Ok(Json(response))
}
