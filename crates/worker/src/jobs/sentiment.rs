use aerofeedback_core::sentiment::analyze;
use aerofeedback_db::repositories::FeedbackRepo;
use aerofeedback_db::DbPool;

/// Label and score up to `batch_size` rows that have not been analysed yet.
///
/// Returns the number of rows updated.
pub async fn run(pool: &DbPool, batch_size: i64) -> Result<usize, sqlx::Error> {
    let rows = FeedbackRepo::list_unanalyzed(pool, batch_size).await?;
    let mut updated = 0;

    for row in &rows {
        let sentiment = analyze(&row.comments);
        match FeedbackRepo::update_sentiment(pool, row.id, sentiment.label, sentiment.score).await {
            Ok(true) => {
                updated += 1;
                tracing::debug!(
                    feedback_id = row.id,
                    label = sentiment.label.as_str(),
                    score = sentiment.score,
                    "Sentiment recorded"
                );
            }
            Ok(false) => tracing::debug!(feedback_id = row.id, "Row no longer exists"),
            Err(e) => {
                tracing::error!(feedback_id = row.id, error = %e, "Failed to record sentiment");
            }
        }
    }

    if updated > 0 {
        tracing::info!(count = updated, "Sentiment pass complete");
    }
    Ok(updated)
}
