use aerofeedback_core::outlier::{is_outlier, rating_gap};
use aerofeedback_db::repositories::FeedbackRepo;
use aerofeedback_db::DbPool;

use super::stored_rating;

/// Compute the outlier flag for up to `batch_size` rows scored since their
/// last check.
///
/// Every candidate is marked checked, whether or not its flag moves. A row
/// with an unusable rating is stored as not an outlier. Returns the number
/// of rows whose flag changed.
pub async fn run(pool: &DbPool, batch_size: i64) -> Result<usize, sqlx::Error> {
    let rows = FeedbackRepo::list_outlier_candidates(pool, batch_size).await?;
    let mut changed = 0;

    for row in &rows {
        let Some(score) = row.sentiment_score else {
            continue;
        };
        let rating = stored_rating(row);
        let flagged = rating.is_some_and(|rating| is_outlier(rating, score));

        match FeedbackRepo::set_outlier(pool, row.id, flagged).await {
            Ok(true) if flagged != row.is_outlier => {
                changed += 1;
                tracing::debug!(
                    feedback_id = row.id,
                    gap = rating.map_or(0.0, |rating| rating_gap(rating, score)),
                    is_outlier = flagged,
                    "Outlier flag updated"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(feedback_id = row.id, error = %e, "Failed to update outlier flag");
            }
        }
    }

    if changed > 0 {
        tracing::info!(count = changed, "Outlier pass complete");
    }
    Ok(changed)
}
