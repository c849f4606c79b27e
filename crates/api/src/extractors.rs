//! Request extractors whose rejections go through [`AppError`], so malformed
//! input gets the same JSON error body as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::middleware::error_handling::AppError;

/// `axum::Json`; a body that is not valid JSON of the expected shape is
/// `INVALID_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path`; an id that does not parse cannot name an existing
/// record, so it is `NOT_FOUND`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `axum::extract::Query`; the only query parameter is the date, so an
/// undecodable query string is `INVALID_DATE`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
