//! Route-scoped middleware that drives the authorization pipeline.
use crate::api::error::ApiError;
use crate::app::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use metrics::counter;
use signit_authz::{AuthError, RequestContext};

/// Run the ordered authorization stages for the request. The protected
/// handler only runs when every stage passes; verified claims ride the
/// request extensions afterwards.
pub async fn require_authorization(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = RequestContext::new(request.headers().clone());
    match state.pipeline.run(ctx).await {
        Ok(ctx) => {
            counter!("signit_auth_requests_total", "outcome" => "allowed").increment(1);
            if let Some(claims) = ctx.into_claims() {
                request.extensions_mut().insert(claims);
            }
            Ok(next.run(request).await)
        }
        Err(err) => {
            counter!("signit_auth_requests_total", "outcome" => outcome_label(&err)).increment(1);
            Err(ApiError::from(err))
        }
    }
}

fn outcome_label(err: &AuthError) -> &'static str {
    match err {
        AuthError::InsufficientPermission => "denied_authz",
        AuthError::KeyResolutionThrottled => "throttled",
        AuthError::KeyResolutionTimeout | AuthError::KeySetUnavailable(_) => "unavailable",
        _ => "denied_authn",
    }
}
