//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, applies the shared CORS policy and tracing, and
//! binds the authorization pipeline to the protected route only. The
//! delegated GraphQL surface, when provided, is nested with the same CORS
//! layer and none of the authorization middleware.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and
//! testable.
use crate::api;
use crate::bootstrap::MediaStorage;
use crate::config::ApiConfig;
use crate::cors;
use crate::middleware::require_authorization;
use anyhow::Result;
use axum::Router;
use signit_authz::AuthPipeline;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AuthPipeline>,
    pub database: Option<PgPool>,
    pub media: Option<MediaStorage>,
}

/// Compose the request chain: CORS outermost, then tracing, then the
/// route-scoped authorization pipeline in front of the protected handler.
/// `graphql` is the externally supplied GraphQL router; it shares the CORS
/// policy and carries its own access control.
pub fn build_router(
    config: &ApiConfig,
    state: AppState,
    graphql: Option<Router>,
) -> Result<Router> {
    let cors = cors::cors_layer(config)?;

    let protected = Router::new()
        .route("/", axum::routing::get(api::secured::secured_resource))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_authorization,
        ));

    let mut router = Router::new()
        .merge(protected)
        .route("/health", axum::routing::get(api::system::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .layer(cors.clone());

    if let Some(graphql) = graphql {
        router = router.nest("/graphql", graphql.layer(cors));
    }

    Ok(router)
}
