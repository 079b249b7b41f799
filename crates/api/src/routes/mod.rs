pub mod feedback;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /feedback                                        submit (POST)
/// /feedback/{id}                                   get stored record
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/feedback", feedback::router())
}
