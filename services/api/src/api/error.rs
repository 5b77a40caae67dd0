//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every failure leaving the
//! authorization pipeline has a stable `code`, a generic message, and a
//! status that separates "not authenticated" (401) from "authenticated but
//! not permitted" (403), with throttling and provider trouble mapped to 429
//! and 503.
//!
//! # Security considerations
//! - Key-resolution details (URLs, transport errors, kids) are logged
//!   server-side only; client messages stay generic.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use signit_authz::AuthError;

/// Structured API error returned by handlers and middleware.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                request_id: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let (status, code, message) = match &err {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "authorization header with a bearer token is required",
            ),
            AuthError::MalformedToken(_)
            | AuthError::UnsupportedAlgorithm
            | AuthError::UnknownKeyId(_) => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "bearer token could not be verified",
            ),
            AuthError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                "invalid_signature",
                "bearer token signature is invalid",
            ),
            AuthError::ClaimMismatch(_) => (
                StatusCode::UNAUTHORIZED,
                "claim_mismatch",
                "bearer token claims do not match this API",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "bearer token has expired",
            ),
            AuthError::InsufficientPermission => (
                StatusCode::FORBIDDEN,
                "insufficient_permission",
                "token is valid but lacks the required permission",
            ),
            AuthError::KeyResolutionThrottled => (
                StatusCode::TOO_MANY_REQUESTS,
                "key_resolution_throttled",
                "token verification is temporarily throttled",
            ),
            AuthError::KeyResolutionTimeout | AuthError::KeySetUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "key_resolution_unavailable",
                "token verification is temporarily unavailable",
            ),
        };
        if status.is_server_error() {
            tracing::warn!(error = %err, "key resolution failure");
        } else {
            tracing::debug!(error = %err, "request denied");
        }
        Self::new(status, code, message)
    }
}
