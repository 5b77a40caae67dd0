//! Ordered authorization stages and the driver that runs them.
//!
//! The pipeline is an explicit stage list rather than nested middleware:
//! each stage is a function from request context to either an updated
//! context or a terminal error, and a single driver loop runs the list in
//! order. The first failing stage halts the chain, so a protected handler
//! only ever runs behind a fully passed pipeline.
use crate::claims::VerifiedClaims;
use crate::errors::{AuthError, AuthResult};
use crate::permission::PermissionPolicy;
use crate::verifier::TokenVerifier;
use async_trait::async_trait;
use http::HeaderMap;
use http::header::AUTHORIZATION;
use std::sync::Arc;

/// Per-request state threaded through the stages.
#[derive(Debug, Clone)]
pub struct RequestContext {
    headers: HeaderMap,
    claims: Option<VerifiedClaims>,
}

impl RequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            claims: None,
        }
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn claims(&self) -> Option<&VerifiedClaims> {
        self.claims.as_ref()
    }

    pub fn set_claims(&mut self, claims: VerifiedClaims) {
        self.claims = Some(claims);
    }

    pub fn into_claims(self) -> Option<VerifiedClaims> {
        self.claims
    }
}

#[async_trait]
pub trait PipelineStage: Send + Sync {
    fn name(&self) -> &'static str;
    async fn apply(&self, ctx: RequestContext) -> AuthResult<RequestContext>;
}

/// Fixed-order stage list; `run` short-circuits on the first failure.
pub struct AuthPipeline {
    stages: Vec<Arc<dyn PipelineStage>>,
}

impl AuthPipeline {
    /// The protected-route pipeline: verify the bearer token, then check the
    /// required permissions against its claims.
    pub fn new(verifier: Arc<TokenVerifier>, policy: PermissionPolicy) -> Self {
        Self::from_stages(vec![
            Arc::new(VerifyToken { verifier }),
            Arc::new(CheckPermissions { policy }),
        ])
    }

    pub fn from_stages(stages: Vec<Arc<dyn PipelineStage>>) -> Self {
        Self { stages }
    }

    pub async fn run(&self, mut ctx: RequestContext) -> AuthResult<RequestContext> {
        for stage in &self.stages {
            ctx = match stage.apply(ctx).await {
                Ok(ctx) => ctx,
                Err(err) => {
                    tracing::debug!(stage = stage.name(), error = %err, "authorization stage failed");
                    return Err(err);
                }
            };
        }
        Ok(ctx)
    }
}

struct VerifyToken {
    verifier: Arc<TokenVerifier>,
}

#[async_trait]
impl PipelineStage for VerifyToken {
    fn name(&self) -> &'static str {
        "verify_token"
    }

    async fn apply(&self, mut ctx: RequestContext) -> AuthResult<RequestContext> {
        let token = TokenVerifier::bearer_token(ctx.authorization())?.to_owned();
        let claims = self.verifier.verify(&token).await?;
        ctx.set_claims(claims);
        Ok(ctx)
    }
}

struct CheckPermissions {
    policy: PermissionPolicy,
}

#[async_trait]
impl PipelineStage for CheckPermissions {
    fn name(&self) -> &'static str {
        "check_permissions"
    }

    async fn apply(&self, ctx: RequestContext) -> AuthResult<RequestContext> {
        // A missing verification stage upstream is a wiring bug; deny.
        let claims = ctx.claims().ok_or(AuthError::MissingToken)?;
        self.policy.check(claims)?;
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingStage {
        label: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl PipelineStage for RecordingStage {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn apply(&self, ctx: RequestContext) -> AuthResult<RequestContext> {
            self.seen.lock().expect("lock").push(self.label);
            if self.fail {
                return Err(AuthError::MissingToken);
            }
            Ok(ctx)
        }
    }

    struct CountingStage {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PipelineStage for CountingStage {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn apply(&self, ctx: RequestContext) -> AuthResult<RequestContext> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ctx)
        }
    }

    #[tokio::test]
    async fn stages_run_in_declared_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pipeline = AuthPipeline::from_stages(vec![
            Arc::new(RecordingStage {
                label: "first",
                seen: seen.clone(),
                fail: false,
            }),
            Arc::new(RecordingStage {
                label: "second",
                seen: seen.clone(),
                fail: false,
            }),
        ]);

        pipeline
            .run(RequestContext::new(HeaderMap::new()))
            .await
            .expect("pipeline");
        assert_eq!(*seen.lock().expect("lock"), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn first_failure_short_circuits_later_stages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = AuthPipeline::from_stages(vec![
            Arc::new(RecordingStage {
                label: "failing",
                seen: seen.clone(),
                fail: true,
            }),
            Arc::new(CountingStage {
                calls: calls.clone(),
            }),
        ]);

        let err = pipeline
            .run(RequestContext::new(HeaderMap::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn permission_stage_denies_without_claims() {
        let stage = CheckPermissions {
            policy: PermissionPolicy::new("https://api.example/app_metadata", vec![]),
        };
        let err = stage
            .apply(RequestContext::new(HeaderMap::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[test]
    fn context_reads_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc".parse().expect("header"));
        let ctx = RequestContext::new(headers);
        assert_eq!(ctx.authorization(), Some("Bearer abc"));
        assert!(ctx.claims().is_none());
    }
}
