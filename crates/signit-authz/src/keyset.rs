//! Remote key-set cache with rate-limited refresh.
//!
//! # Purpose
//! Resolve RSA verification keys by `kid`, fetching the provider's published
//! key set only on cache miss and never more than the configured number of
//! times per window.
//!
//! # Concurrency model
//! The `kid`-indexed cache is a `DashMap` read on every resolution. The miss
//! path is serialized behind an async mutex: a task that loses the race
//! re-checks the cache before consuming a limiter slot, so concurrent misses
//! triggered by one key rotation cost a single fetch. The fixed-window
//! limiter state lives inside the same mutex, which makes the fetch ceiling
//! process-global rather than per-request.
use crate::errors::{AuthError, AuthResult};
use crate::jwks::Jwks;
use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::DecodingKey;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// How long a resolved key is reused before the next miss refetches it.
pub const DEFAULT_KEY_TTL: Duration = Duration::from_secs(600);
/// Upper bound on a single key-set fetch before it fails as timed out.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(1500);
/// Fetches allowed per window, matching the provider's published guidance.
pub const DEFAULT_FETCHES_PER_WINDOW: u32 = 5;
/// Fixed rate-limit window.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Transport seam for key-set retrieval; injected in tests.
#[async_trait]
pub trait KeySetFetcher: Send + Sync {
    async fn fetch(&self, jwks_url: &str) -> AuthResult<Jwks>;
}

/// Default fetcher hitting the well-known endpoint over HTTPS.
pub struct HttpKeySetFetcher {
    client: reqwest::Client,
}

impl HttpKeySetFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpKeySetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySetFetcher for HttpKeySetFetcher {
    async fn fetch(&self, jwks_url: &str) -> AuthResult<Jwks> {
        let response = self
            .client
            .get(jwks_url)
            .send()
            .await
            .map_err(|err| AuthError::KeySetUnavailable(err.to_string()))?;
        let response = response
            .error_for_status()
            .map_err(|err| AuthError::KeySetUnavailable(err.to_string()))?;
        response
            .json::<Jwks>()
            .await
            .map_err(|err| AuthError::KeySetUnavailable(err.to_string()))
    }
}

struct CachedKey {
    decoding_key: DecodingKey,
    expires_at: Instant,
}

struct FetchWindow {
    window_start: Instant,
    used: u32,
}

impl FetchWindow {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            used: 0,
        }
    }

    fn try_acquire(&mut self, now: Instant, limit: u32, window: Duration) -> bool {
        if now.duration_since(self.window_start) >= window {
            self.window_start = now;
            self.used = 0;
        }
        if self.used >= limit {
            return false;
        }
        self.used += 1;
        true
    }
}

/// Shared cache of the provider's verification keys.
pub struct KeySetCache {
    jwks_url: String,
    key_ttl: Duration,
    fetch_timeout: Duration,
    fetch_limit: u32,
    keys: DashMap<String, CachedKey>,
    fetch_gate: Mutex<FetchWindow>,
    fetcher: Arc<dyn KeySetFetcher>,
}

impl KeySetCache {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self::with_fetcher(jwks_url, Arc::new(HttpKeySetFetcher::new()))
    }

    pub fn with_fetcher(jwks_url: impl Into<String>, fetcher: Arc<dyn KeySetFetcher>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            key_ttl: DEFAULT_KEY_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            fetch_limit: DEFAULT_FETCHES_PER_WINDOW,
            keys: DashMap::new(),
            fetch_gate: Mutex::new(FetchWindow::new(Instant::now())),
            fetcher,
        }
    }

    /// Override cache and limiter tuning; defaults suit the hosted provider.
    pub fn with_limits(
        mut self,
        key_ttl: Duration,
        fetch_timeout: Duration,
        fetch_limit: u32,
    ) -> Self {
        self.key_ttl = key_ttl;
        self.fetch_timeout = fetch_timeout;
        self.fetch_limit = fetch_limit;
        self
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Resolve the verification key for `kid`, fetching the key set at most
    /// once and only when the limiter allows it.
    pub async fn resolve_key(&self, kid: &str) -> AuthResult<DecodingKey> {
        if let Some(entry) = self.keys.get(kid)
            && entry.expires_at > Instant::now()
        {
            return Ok(entry.decoding_key.clone());
        }

        let mut gate = self.fetch_gate.lock().await;
        // Another task may have refreshed the set while we waited on the gate.
        if let Some(entry) = self.keys.get(kid)
            && entry.expires_at > Instant::now()
        {
            return Ok(entry.decoding_key.clone());
        }
        if !gate.try_acquire(Instant::now(), self.fetch_limit, RATE_WINDOW) {
            tracing::warn!(%kid, "key set fetch throttled");
            return Err(AuthError::KeyResolutionThrottled);
        }

        let jwks = match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(&self.jwks_url))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(%kid, "key set fetch timed out");
                return Err(AuthError::KeyResolutionTimeout);
            }
        };

        // The gate stays held through the inserts so a losing task finds the
        // refreshed keys in its double-check instead of fetching again.
        let expires_at = Instant::now() + self.key_ttl;
        for key in &jwks.keys {
            match DecodingKey::from_rsa_components(&key.n, &key.e) {
                Ok(decoding_key) => {
                    self.keys.insert(
                        key.kid.clone(),
                        CachedKey {
                            decoding_key,
                            expires_at,
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(kid = %key.kid, error = %err, "skipping unusable jwk");
                }
            }
        }

        self.keys
            .get(kid)
            .map(|entry| entry.decoding_key.clone())
            .ok_or_else(|| AuthError::UnknownKeyId(kid.to_string()))
    }
}
