//! # Authentication Module
//!
//! Identity verification for the DocSlot API. Callers present an HS256 JWT
//! as `Authorization: Bearer <token>`; the verifier turns it into a
//! [`Caller`] (user id and role) or rejects the request.
//!
//! Verification fails closed: a missing header, a malformed or expired
//! token, a bad signature, an unknown role or a non-UUID subject all yield
//! `SlotError::Unauthenticated`.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use docslot_core::{
    errors::{SlotError, SlotResult},
    models::caller::{Caller, Role},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Claims carried by identity tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID)
    pub sub: String,
    pub role: Role,
    /// Expiry, seconds since the Unix epoch
    pub exp: u64,
}

/// Turns a bearer credential into a verified caller identity.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> SlotResult<Caller>;
}

/// Verifies HS256-signed JWTs against a shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> SlotResult<Caller> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!("Token verification failed: {}", e);
            SlotError::Unauthenticated("Invalid or expired token".to_string())
        })?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| {
            SlotError::Unauthenticated("Token subject is not a valid user id".to_string())
        })?;

        Ok(Caller::new(id, data.claims.role))
    }
}

/// Extractor yielding the verified caller of the current request.
///
/// Doctors are registered on first sight, so every authenticated doctor
/// has a calendar to query.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Caller);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthenticatedCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| SlotError::Unauthenticated("Missing authorization header".to_string()))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                SlotError::Unauthenticated("Invalid authorization header format".to_string())
            })?;

        let caller = state.verifier.verify(token.trim())?;
        state.service.register_caller(&caller).await?;

        Ok(AuthenticatedCaller(caller))
    }
}
