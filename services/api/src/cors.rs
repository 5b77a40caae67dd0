//! CORS policy selection by deployment mode.
//!
//! One exact origin per mode, no wildcard, no list. The same layer instance
//! shape is applied to the base API router and the delegated GraphQL mount so
//! both surfaces present an identical cross-origin policy.
use crate::config::{ApiConfig, DeploymentMode};
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// The single origin allowed for the configured mode. Total over the mode
/// enum; unknown environment values were already collapsed to `Production`
/// when the mode was parsed.
pub fn allowed_origin(config: &ApiConfig) -> &str {
    match config.mode {
        DeploymentMode::Development => &config.dev_origin,
        DeploymentMode::Production => &config.prod_origin,
    }
}

/// Layer enforcing the mode-selected origin.
pub fn cors_layer(config: &ApiConfig) -> Result<CorsLayer> {
    let origin: HeaderValue = allowed_origin(config)
        .parse()
        .with_context(|| "parse allowed CORS origin")?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DEV_ORIGIN, DEFAULT_PROD_ORIGIN};
    use std::net::SocketAddr;

    fn config_for(mode: DeploymentMode) -> ApiConfig {
        ApiConfig {
            mode,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            metrics_bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            issuer: "https://issuer.example/".to_string(),
            audience: "https://api.example/".to_string(),
            jwks_url: "https://issuer.example/.well-known/jwks.json".to_string(),
            claims_namespace: "https://api.example/app_metadata".to_string(),
            required_permissions: vec!["custom:perm2".to_string()],
            dev_origin: DEFAULT_DEV_ORIGIN.to_string(),
            prod_origin: DEFAULT_PROD_ORIGIN.to_string(),
            database_url: None,
            media_base_url: "https://api.cloudinary.com".to_string(),
            media_cloud: None,
        }
    }

    #[test]
    fn origin_follows_mode() {
        assert_eq!(
            allowed_origin(&config_for(DeploymentMode::Development)),
            DEFAULT_DEV_ORIGIN
        );
        assert_eq!(
            allowed_origin(&config_for(DeploymentMode::Production)),
            DEFAULT_PROD_ORIGIN
        );
    }

    #[test]
    fn layer_builds_for_both_modes() {
        cors_layer(&config_for(DeploymentMode::Development)).expect("dev layer");
        cors_layer(&config_for(DeploymentMode::Production)).expect("prod layer");
    }
}
