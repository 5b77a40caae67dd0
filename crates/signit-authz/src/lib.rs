//! Signit authn/authz primitives shared by the API service and its tests.
//!
//! # Purpose
//! Centralizes bearer-token verification against the identity provider's
//! published key set, namespaced permission checks, and the ordered
//! authorization pipeline the service binds to protected routes.
//!
//! # How it fits
//! The API service builds a [`TokenVerifier`] and [`PermissionPolicy`] from
//! configuration, composes them into an [`AuthPipeline`], and drives the
//! pipeline from route-scoped middleware. Nothing in this crate knows about
//! routers or response types.
//!
//! # Key invariants
//! - Tokens are RS256 only; other algorithms are rejected before any key
//!   resolution happens.
//! - Key-set fetches happen on cache miss only, serialized, and are capped by
//!   a process-global fixed window.
//! - Issuer and audience values must match the verifier configuration.
//!
//! # Common pitfalls
//! - A permission claim stored outside the configured namespace key is
//!   invisible to the policy check and the request is denied.
//! - Sharing a [`KeySetCache`] per request instead of per process defeats the
//!   fetch ceiling.

mod claims;
mod errors;
mod jwks;
mod keyset;
mod permission;
mod pipeline;
mod verifier;

pub use claims::VerifiedClaims;
pub use errors::{AuthError, AuthResult};
pub use jwks::{Jwk, Jwks, KeyUse};
pub use keyset::{
    DEFAULT_FETCHES_PER_WINDOW, DEFAULT_FETCH_TIMEOUT, DEFAULT_KEY_TTL, HttpKeySetFetcher,
    KeySetCache, KeySetFetcher, RATE_WINDOW,
};
pub use permission::PermissionPolicy;
pub use pipeline::{AuthPipeline, PipelineStage, RequestContext};
pub use verifier::TokenVerifier;
