//! System/health API handlers.
use crate::api::types::{ExternalStatus, HealthStatus};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

/// Liveness probe. Fast and side-effect free; reports which external handles
/// were configured at bootstrap without touching them.
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        externals: ExternalStatus {
            database: state.database.is_some(),
            media_storage: state.media.is_some(),
        },
    })
}
