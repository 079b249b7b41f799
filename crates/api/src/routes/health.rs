use aerofeedback_db::repositories::FeedbackRepo;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Number of stored feedback records; `null` when it could not be read.
    pub stored_feedback: Option<i64>,
}

/// GET /health -- service, database and feedback store status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = aerofeedback_db::health_check(&state.pool).await.is_ok();

    let stored_feedback = if db_healthy {
        match FeedbackRepo::count(&state.pool).await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to count stored feedback");
                None
            }
        }
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        stored_feedback,
    })
}

/// Mount health check routes (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
