use axum::http::StatusCode;
use docslot_core::models::time_slot::{GenerateSlotsResponse, RosterResponse};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, bearer, doctor, patient};

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");

    let response = ctx.server.get("/version").await;
    assert_eq!(response.json::<Value>()["name"], "docslot-api");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();

    let response = ctx
        .server
        .get(&format!("/api/doctors/{doctor_id}/slots/available?date=2024-05-01"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(ctx.store.slot_count().await, 0);
}

#[tokio::test]
async fn test_full_booking_flow() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (auth_name, auth_value) = bearer(&doc);
    let pat = patient();
    let (patient_name, patient_value) = bearer(&pat);

    // Doctor creates two slots
    let response = ctx
        .server
        .post(&format!("/api/doctors/{}/slots", doc.id))
        .add_header(auth_name.clone(), auth_value.clone())
        .json(&json!({
            "date": "2024-05-01",
            "slots": [{"time": "09:00", "duration": 30}, {"time": "09:30", "duration": 30}],
            "overrideExisting": false
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let generated: GenerateSlotsResponse = response.json();
    assert_eq!(generated.created, 2);
    assert_eq!(generated.total, 2);
    let nine = generated.roster[0].id;
    let nine_thirty = generated.roster[1].id;

    // Patient sees both as bookable
    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots/available?date=2024-05-01", doc.id))
        .add_header(patient_name.clone(), patient_value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["slots"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["slots"][0]["time"], "09:00");

    // First booking wins, second conflicts
    let response = ctx
        .server
        .post(&format!("/api/slots/{nine}/book"))
        .add_header(patient_name.clone(), patient_value.clone())
        .json(&json!({ "appointmentId": Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["booked"], true);

    let response = ctx
        .server
        .post(&format!("/api/slots/{nine}/book"))
        .add_header(patient_name.clone(), patient_value.clone())
        .json(&json!({ "appointmentId": Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "ALREADY_BOOKED");

    // Booked slot cannot be deleted; the free one can
    let response = ctx
        .server
        .delete(&format!("/api/slots/{nine}"))
        .add_header(auth_name.clone(), auth_value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "SLOT_BOOKED");

    let response = ctx
        .server
        .delete(&format!("/api/slots/{nine_thirty}"))
        .add_header(auth_name.clone(), auth_value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["deleted"], true);

    // Roster reflects one booked slot
    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots?date=2024-05-01", doc.id))
        .add_header(auth_name.clone(), auth_value.clone())
        .await;
    let roster: RosterResponse = response.json();
    assert_eq!(roster.total, 1);
    assert_eq!(roster.available_count, 0);
    assert!(roster.slots[0].is_booked);

    // Cancellation releases the slot
    let response = ctx
        .server
        .post(&format!("/api/slots/{nine}/release"))
        .add_header(patient_name, patient_value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["released"], true);
}

#[tokio::test]
async fn test_patient_cannot_manage_doctor_calendar() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (name, value) = bearer(&patient());

    let response = ctx
        .server
        .post(&format!("/api/doctors/{}/slots", doc.id))
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "date": "2024-05-01",
            "slots": [{"time": "09:00", "duration": 30}]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "UNAUTHORIZED");

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots?date=2024-05-01", doc.id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(ctx.store.slot_count().await, 0);
}

#[tokio::test]
async fn test_generate_validation_errors() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (name, value) = bearer(&doc);
    let path = format!("/api/doctors/{}/slots", doc.id);

    let response = ctx
        .server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "date": "05/01/2024", "slots": [{"time": "09:00", "duration": 30}] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_DATE");

    let response = ctx
        .server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "date": "2024-05-01", "slots": [] }))
        .await;
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_SLOTS");

    let response = ctx
        .server
        .post(&path)
        .add_header(name, value)
        .json(&json!({ "date": "2024-05-01", "slots": [{"time": "25:00", "duration": 30}] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "NO_VALID_SLOTS");
    assert_eq!(ctx.store.slot_count().await, 0);
}

#[tokio::test]
async fn test_missing_date_is_invalid() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (name, value) = bearer(&doc);

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots/available", doc.id))
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_DATE");
}

#[tokio::test]
async fn test_unknown_doctor_availability() {
    let ctx = TestContext::new();
    let (name, value) = bearer(&patient());

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots/available?date=2024-05-01", Uuid::new_v4()))
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "DOCTOR_NOT_FOUND");
}

#[tokio::test]
async fn test_doctor_is_registered_on_first_request() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (name, value) = bearer(&doc);

    // The roster request is the doctor's first authenticated call
    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots?date=2024-05-01", doc.id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.json::<Value>()["total"], 0);

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots/available?date=2024-05-01", doc.id))
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["slots"], json!([]));
}

#[tokio::test]
async fn test_malformed_entries_do_not_reject_their_siblings() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (name, value) = bearer(&doc);

    let response = ctx
        .server
        .post(&format!("/api/doctors/{}/slots", doc.id))
        .add_header(name, value)
        .json(&json!({
            "date": "2024-05-01",
            "slots": [
                {"time": "09:00", "duration": 30},
                {"time": "09:30", "duration": "30"},
                {"duration": 30},
                {"time": "10:00", "duration": 30}
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let generated: GenerateSlotsResponse = response.json();
    assert_eq!(generated.created, 2);
    let times: Vec<String> = generated
        .roster
        .iter()
        .map(|slot| slot.time.format("%H:%M").to_string())
        .collect();
    assert_eq!(times, vec!["09:00", "10:00"]);
    assert_eq!(ctx.store.slot_count().await, 2);
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (name, value) = bearer(&doc);
    let path = format!("/api/doctors/{}/slots", doc.id);

    let response = ctx
        .server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "date": "2024-05-01", "slots": "09:00" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert_eq!(body["error"]["kind"], "validation");

    let response = ctx
        .server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .text("date=2024-05-01")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_REQUEST");

    // A missing date is an invalid date, not a malformed body
    let response = ctx
        .server
        .post(&path)
        .add_header(name, value)
        .json(&json!({ "slots": [{"time": "09:00", "duration": 30}] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "INVALID_DATE");
    assert_eq!(ctx.store.slot_count().await, 0);
}

#[tokio::test]
async fn test_unparseable_ids_are_not_found() {
    let ctx = TestContext::new();
    let doc = doctor();
    let (name, value) = bearer(&doc);

    let response = ctx
        .server
        .get("/api/doctors/not-a-uuid/slots/available?date=2024-05-01")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");

    let response = ctx
        .server
        .delete("/api/slots/42")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["kind"], "not_found");
}
