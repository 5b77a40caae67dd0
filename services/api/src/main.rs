//! Signit API service entry point.
//!
//! # Purpose
//! Loads configuration, initializes observability and the external handles in
//! order, wires the authorization pipeline into the router, and serves until
//! shutdown. Teardown runs after the listener drains.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup
//! logic.
use anyhow::Context;
use signit_api::app::{AppState, build_router};
use signit_api::bootstrap::{self, ExternalHandles};
use signit_api::config::ApiConfig;
use signit_api::observability;
use signit_authz::{AuthPipeline, PermissionPolicy, TokenVerifier};
use std::future::Future;
use std::sync::Arc;

// Allowed clock skew when validating token expiry, in seconds.
const TOKEN_LEEWAY_SECS: u64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env_or_yaml().context("load api config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ApiConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("signit-api", config.mode);
    let handles = bootstrap::init_external(&config).await?;
    let state = build_state(&config, &handles);
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(&config, state, None)?;

    let addr = config.bind_addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "failed to bind api listener");
            return Err(err.into());
        }
    };
    tracing::info!(%addr, mode = config.mode.as_str(), "api listening");

    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    handles.shutdown().await;
    Ok(())
}

fn build_state(config: &ApiConfig, handles: &ExternalHandles) -> AppState {
    let verifier = Arc::new(TokenVerifier::new(
        config.issuer.clone(),
        config.audience.clone(),
        TOKEN_LEEWAY_SECS,
        handles.key_set.clone(),
    ));
    let policy = PermissionPolicy::new(
        config.claims_namespace.clone(),
        config.required_permissions.clone(),
    );
    AppState {
        pipeline: Arc::new(AuthPipeline::new(verifier, policy)),
        database: handles.database.clone(),
        media: handles.media.clone(),
    }
}
