//! Post-processing passes over stored feedback.
//!
//! Each pass handles rows one at a time; a failing row is logged and skipped
//! so it never aborts the rest of the pass. Only a failure to list the rows
//! is returned to the caller.

pub mod follow_up;
pub mod outlier;
pub mod sentiment;

use aerofeedback_core::rating::Rating;
use aerofeedback_db::models::feedback::Feedback;

/// The row's rating, or `None` (logged) if the stored value is out of range.
fn stored_rating(row: &Feedback) -> Option<Rating> {
    match Rating::try_from(row.rating) {
        Ok(rating) => Some(rating),
        Err(e) => {
            tracing::warn!(feedback_id = row.id, error = %e, "Skipping row with invalid rating");
            None
        }
    }
}
