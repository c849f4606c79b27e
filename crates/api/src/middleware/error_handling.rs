//! # Error Handling Middleware
//!
//! Maps `SlotError` onto HTTP status codes and a JSON body of the form
//! `{"error": {"code": "...", "kind": "...", "message": "..."}}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use docslot_core::errors::SlotError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on anything that
/// yields a `SlotError`.
#[derive(Debug)]
pub struct AppError(pub SlotError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SlotError::InvalidDate(_)
            | SlotError::InvalidSlots(_)
            | SlotError::NoValidSlots(_)
            | SlotError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SlotError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SlotError::Unauthorized(_) | SlotError::NotOwner(_) => StatusCode::FORBIDDEN,
            SlotError::NotFound(_) | SlotError::DoctorNotFound(_) => StatusCode::NOT_FOUND,
            SlotError::SlotBooked(_) | SlotError::AlreadyBooked(_) | SlotError::NotBooked(_) => {
                StatusCode::CONFLICT
            }
            SlotError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SlotError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage internals stay in the logs
        let message = match &self.0 {
            SlotError::Database(report) => {
                tracing::error!("Internal error: {:?}", report);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.0.code(),
                "kind": self.0.kind().as_str(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(SlotError::InvalidRequest(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(SlotError::NotFound(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(SlotError::InvalidDate(rejection.body_text()))
    }
}

/// Maps a SlotError to an HTTP response
pub fn map_error(err: SlotError) -> Response {
    AppError(err).into_response()
}
