use anyhow::{Context, Result};
use axum::http::HeaderValue;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:8081";
pub const DEFAULT_ISSUER: &str = "https://signit.eu.auth0.com/";
pub const DEFAULT_AUDIENCE: &str = "https://signit-api.dscnitrourkela.org/";
pub const DEFAULT_CLAIMS_NAMESPACE: &str = "https://signit-api.dscnitrourkela.org/app_metadata";
pub const DEFAULT_REQUIRED_PERMISSIONS: &str = "custom:perm2";
pub const DEFAULT_DEV_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_PROD_ORIGIN: &str = "https://certificate.dscnitrourkela.org";
pub const DEFAULT_MEDIA_BASE_URL: &str = "https://api.cloudinary.com";

/// Deployment mode, fixed at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Development,
    Production,
}

impl DeploymentMode {
    /// Unrecognized values collapse to `Production` so a typo never widens
    /// the CORS policy or the default log verbosity (fail closed).
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

// API service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub mode: DeploymentMode,
    // API listener bind address (0.0.0.0:SIGNIT_PORT).
    pub bind_addr: SocketAddr,
    // Metrics HTTP listener bind address.
    pub metrics_bind: SocketAddr,
    // Trusted token issuer.
    pub issuer: String,
    // Expected audience (API identifier).
    pub audience: String,
    // Key-set endpoint; derived from the issuer when unset.
    pub jwks_url: String,
    // Claim key holding the namespaced permission list.
    pub claims_namespace: String,
    // Permissions that must all be present on protected routes.
    pub required_permissions: Vec<String>,
    // CORS origin used in development mode.
    pub dev_origin: String,
    // CORS origin used in production mode.
    pub prod_origin: String,
    // Optional database connection string.
    pub database_url: Option<String>,
    // Media host API base URL.
    pub media_base_url: String,
    // Media host account; the media handle is disabled when unset.
    pub media_cloud: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiConfigOverride {
    mode: Option<String>,
    port: Option<u16>,
    metrics_bind: Option<String>,
    issuer: Option<String>,
    audience: Option<String>,
    jwks_url: Option<String>,
    claims_namespace: Option<String>,
    required_permissions: Option<Vec<String>>,
    dev_origin: Option<String>,
    prod_origin: Option<String>,
    database_url: Option<String>,
    media_base_url: Option<String>,
    media_cloud: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let mode = DeploymentMode::parse(&std::env::var("SIGNIT_ENV").unwrap_or_default());
        let port = std::env::var("SIGNIT_PORT")
            .ok()
            .map(|value| value.parse::<u16>().with_context(|| "parse SIGNIT_PORT"))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);
        let metrics_bind = std::env::var("SIGNIT_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse SIGNIT_METRICS_BIND")?;
        let issuer = env_or("SIGNIT_ISSUER", DEFAULT_ISSUER);
        let audience = env_or("SIGNIT_AUDIENCE", DEFAULT_AUDIENCE);
        let jwks_url =
            std::env::var("SIGNIT_JWKS_URL").unwrap_or_else(|_| default_jwks_url(&issuer));
        let claims_namespace = env_or("SIGNIT_CLAIMS_NAMESPACE", DEFAULT_CLAIMS_NAMESPACE);
        let required_permissions = split_permissions(&env_or(
            "SIGNIT_REQUIRED_PERMISSIONS",
            DEFAULT_REQUIRED_PERMISSIONS,
        ));
        let dev_origin = env_or("SIGNIT_DEV_ORIGIN", DEFAULT_DEV_ORIGIN);
        let prod_origin = env_or("SIGNIT_PROD_ORIGIN", DEFAULT_PROD_ORIGIN);
        let database_url = std::env::var("SIGNIT_DATABASE_URL").ok();
        let media_base_url = env_or("SIGNIT_MEDIA_BASE_URL", DEFAULT_MEDIA_BASE_URL);
        let media_cloud = std::env::var("SIGNIT_MEDIA_CLOUD").ok();

        let config = Self {
            mode,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            metrics_bind,
            issuer,
            audience,
            jwks_url,
            claims_namespace,
            required_permissions,
            dev_origin,
            prod_origin,
            database_url,
            media_base_url,
            media_cloud,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("SIGNIT_CONFIG") {
            // YAML overrides allow ops-friendly config files.
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read SIGNIT_CONFIG: {path}"))?;
            let override_cfg: ApiConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse api config yaml")?;
            if let Some(value) = override_cfg.mode {
                config.mode = DeploymentMode::parse(&value);
            }
            if let Some(value) = override_cfg.port {
                config.bind_addr = SocketAddr::from(([0, 0, 0, 0], value));
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.issuer {
                config.jwks_url = std::env::var("SIGNIT_JWKS_URL")
                    .unwrap_or_else(|_| default_jwks_url(&value));
                config.issuer = value;
            }
            if let Some(value) = override_cfg.audience {
                config.audience = value;
            }
            if let Some(value) = override_cfg.jwks_url {
                config.jwks_url = value;
            }
            if let Some(value) = override_cfg.claims_namespace {
                config.claims_namespace = value;
            }
            if let Some(value) = override_cfg.required_permissions {
                config.required_permissions = value;
            }
            if let Some(value) = override_cfg.dev_origin {
                config.dev_origin = value;
            }
            if let Some(value) = override_cfg.prod_origin {
                config.prod_origin = value;
            }
            if let Some(value) = override_cfg.database_url {
                config.database_url = Some(value);
            }
            if let Some(value) = override_cfg.media_base_url {
                config.media_base_url = value;
            }
            if let Some(value) = override_cfg.media_cloud {
                config.media_cloud = Some(value);
            }
            config.validate()?;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.dev_origin
            .parse::<HeaderValue>()
            .with_context(|| "parse development CORS origin")?;
        self.prod_origin
            .parse::<HeaderValue>()
            .with_context(|| "parse production CORS origin")?;
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn default_jwks_url(issuer: &str) -> String {
    format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
}

fn split_permissions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|perm| !perm.is_empty())
        .map(String::from)
        .collect()
}
