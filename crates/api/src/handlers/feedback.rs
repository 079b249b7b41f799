//! Handlers for feedback submission and lookup.
//!
//! Submissions are re-validated with the same rules the wizard applies
//! before anything is written.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use aerofeedback_core::error::CoreError;
use aerofeedback_core::submission::FeedbackSubmission;
use aerofeedback_core::types::DbId;
use aerofeedback_db::models::feedback::CreateFeedback;
use aerofeedback_db::repositories::FeedbackRepo;

use crate::error::{AppError, AppResult};
use crate::response::{CreatedResponse, DataResponse};
use crate::state::AppState;

/// Message returned to the submitter when the insert fails.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save feedback to database";

// ---------------------------------------------------------------------------
// POST /feedback
// ---------------------------------------------------------------------------

/// Validate and store one completed feedback session.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(input): Json<CreateFeedback>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!(
        rating = input.rating,
        area_count = input.feedback_areas.len(),
        "Received feedback submission",
    );

    let submission = FeedbackSubmission::from_raw(
        &input.contact(),
        input.rating,
        &input.feedback_areas,
        &state.config.contact_rules,
    )?;

    let feedback = FeedbackRepo::create(&state.pool, &submission)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert feedback");
            AppError::Persistence(SAVE_FAILED_MESSAGE.to_string())
        })?;

    tracing::info!(
        feedback_id = feedback.id,
        rating = feedback.rating,
        "Feedback stored",
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Feedback submitted successfully",
            data: feedback,
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /feedback/{id}
// ---------------------------------------------------------------------------

/// Get a single stored feedback record by ID.
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let feedback = FeedbackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feedback",
            id,
        }))?;

    Ok(Json(DataResponse { data: feedback }))
}
