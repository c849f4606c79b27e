use axum::http::StatusCode;
use docslot_core::models::time_slot::GenerateSlotsResponse;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, bearer, doctor, patient};

async fn seeded_slot(ctx: &TestContext) -> Uuid {
    let doc = doctor();
    let (name, value) = bearer(&doc);

    let response = ctx
        .server
        .post(&format!("/api/doctors/{}/slots", doc.id))
        .add_header(name, value)
        .json(&json!({ "date": "2024-05-01", "slots": [{"time": "09:00", "duration": 30}] }))
        .await;
    let generated: GenerateSlotsResponse = response.json();
    generated.roster[0].id
}

#[tokio::test]
async fn test_book_without_appointment_is_invalid_request() {
    let ctx = TestContext::new();
    let slot_id = seeded_slot(&ctx).await;
    let (name, value) = bearer(&patient());

    let response = ctx
        .server
        .post(&format!("/api/slots/{slot_id}/book"))
        .add_header(name.clone(), value.clone())
        .json(&json!({ "appointmentId": "tomorrow" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_REQUEST");

    let response = ctx
        .server
        .post(&format!("/api/slots/{slot_id}/book"))
        .add_header(name, value)
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_REQUEST");

    assert_eq!(ctx.store.slot_count().await, 1);
}

#[tokio::test]
async fn test_release_of_free_slot_conflicts() {
    let ctx = TestContext::new();
    let slot_id = seeded_slot(&ctx).await;
    let (name, value) = bearer(&patient());

    let response = ctx
        .server
        .post(&format!("/api/slots/{slot_id}/release"))
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_BOOKED");
}

#[tokio::test]
async fn test_book_unknown_slot_is_not_found() {
    let ctx = TestContext::new();
    let (name, value) = bearer(&patient());

    let response = ctx
        .server
        .post(&format!("/api/slots/{}/book", Uuid::new_v4()))
        .add_header(name, value)
        .json(&json!({ "appointmentId": Uuid::new_v4() }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");
}
