//! Route definitions for feedback submission.
//!
//! Mounted at `/feedback` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Feedback routes.
///
/// ```text
/// POST   /                  -> submit_feedback
/// GET    /{id}              -> get_feedback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(feedback::submit_feedback))
        .route("/{id}", get(feedback::get_feedback))
}
