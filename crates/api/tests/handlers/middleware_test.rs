use axum::{body::to_bytes, http::StatusCode};
use chrono::Duration;
use docslot_api::middleware::{
    auth::{IdentityVerifier, JwtVerifier},
    error_handling::map_error,
};
use docslot_core::errors::SlotError;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{SECRET, doctor, patient, token_for};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

#[tokio::test]
async fn test_error_handling_status_codes() {
    let cases = vec![
        (SlotError::InvalidDate("bad".into()), StatusCode::BAD_REQUEST),
        (SlotError::InvalidSlots("bad".into()), StatusCode::BAD_REQUEST),
        (SlotError::NoValidSlots("none".into()), StatusCode::BAD_REQUEST),
        (SlotError::InvalidRequest("not json".into()), StatusCode::BAD_REQUEST),
        (SlotError::Unauthenticated("no token".into()), StatusCode::UNAUTHORIZED),
        (SlotError::Unauthorized("no".into()), StatusCode::FORBIDDEN),
        (SlotError::NotOwner("no".into()), StatusCode::FORBIDDEN),
        (SlotError::NotFound("gone".into()), StatusCode::NOT_FOUND),
        (SlotError::DoctorNotFound("gone".into()), StatusCode::NOT_FOUND),
        (SlotError::SlotBooked("booked".into()), StatusCode::CONFLICT),
        (SlotError::AlreadyBooked("taken".into()), StatusCode::CONFLICT),
        (SlotError::NotBooked("free".into()), StatusCode::CONFLICT),
        (SlotError::Unavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
        (
            SlotError::Database(eyre::eyre!("Database error")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        let code = error.code();
        let response = map_error(error);
        assert_eq!(response.status(), expected, "status for {code}");
    }
}

#[tokio::test]
async fn test_error_body_carries_code_and_kind() {
    let response = map_error(SlotError::AlreadyBooked("Slot 1 is already booked".into()));
    let body = body_json(response).await;

    assert_eq!(body["error"]["code"], "ALREADY_BOOKED");
    assert_eq!(body["error"]["kind"], "conflict");
    assert_eq!(
        body["error"]["message"],
        "Slot already booked: Slot 1 is already booked"
    );
}

#[tokio::test]
async fn test_database_error_details_are_hidden() {
    let response = map_error(SlotError::Database(eyre::eyre!("password authentication failed")));
    let body = body_json(response).await;

    assert_eq!(body["error"]["code"], "INTERNAL");
    assert_eq!(body["error"]["message"], "Internal server error");
}

#[test]
fn test_jwt_verifier_accepts_valid_token() {
    let verifier = JwtVerifier::new(SECRET);
    let caller = doctor();

    let verified = verifier
        .verify(&token_for(&caller, SECRET, Duration::minutes(5)))
        .unwrap();

    assert_eq!(verified, caller);
}

#[test]
fn test_jwt_verifier_fails_closed() {
    let verifier = JwtVerifier::new(SECRET);
    let caller = patient();

    let wrong_secret = token_for(&caller, "another-secret", Duration::minutes(5));
    let expired = token_for(&caller, SECRET, Duration::hours(-2));

    for token in [wrong_secret.as_str(), expired.as_str(), "not-a-jwt", ""] {
        assert!(matches!(
            verifier.verify(token),
            Err(SlotError::Unauthenticated(_))
        ));
    }
}
