//! The protected resource handler.
//!
//! The authorization pipeline runs in route-scoped middleware before this
//! handler; by the time it executes the request is authenticated and
//! authorized, and the verified claims are available in request extensions
//! for handlers that need them.
use axum::Extension;
use signit_authz::VerifiedClaims;

pub(crate) const SECURED_BODY: &str = "Secured Resource";

/// Fixed success body returned once the pipeline passes.
pub(crate) async fn secured_resource(
    Extension(claims): Extension<VerifiedClaims>,
) -> &'static str {
    tracing::debug!(subject = claims.subject().unwrap_or("unknown"), "secured resource served");
    SECURED_BODY
}
