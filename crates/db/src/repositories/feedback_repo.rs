//! Repository for the `airport_feedback` table.

use aerofeedback_core::sentiment::SentimentLabel;
use aerofeedback_core::submission::FeedbackSubmission;
use aerofeedback_core::types::DbId;
use sqlx::PgPool;

use crate::models::feedback::Feedback;

/// Column list for `airport_feedback` queries.
const COLUMNS: &str = "\
    id, name, phone, email, rating, feedback_areas, comments, \
    sentiment_label, sentiment_score, is_outlier, email_sent, \
    staff_alert_sent, follow_up_attempts, last_follow_up_at, outlier_checked_at, created_at";

/// Provides insert, lookup and post-processing updates for feedback rows.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Append one feedback row, returning the stored record.
    pub async fn create(
        pool: &PgPool,
        input: &FeedbackSubmission,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO airport_feedback \
                (name, phone, email, rating, feedback_areas, comments) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(i16::from(input.rating))
            .bind(input.feedback_area_ids())
            .bind(&input.comments)
            .fetch_one(pool)
            .await
    }

    /// Find a feedback row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM airport_feedback WHERE id = $1");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of stored rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM airport_feedback")
            .fetch_one(pool)
            .await
    }

    /// Rows that have not been through sentiment analysis yet, oldest first.
    pub async fn list_unanalyzed(pool: &PgPool, limit: i64) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM airport_feedback \
             WHERE sentiment_label IS NULL \
             ORDER BY id ASC LIMIT $1"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Store the sentiment label and score for a row.
    ///
    /// A new score invalidates the outlier flag, so the row becomes an
    /// outlier candidate again.
    pub async fn update_sentiment(
        pool: &PgPool,
        id: DbId,
        label: SentimentLabel,
        score: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE airport_feedback \
             SET sentiment_label = $1, sentiment_score = $2, outlier_checked_at = NULL \
             WHERE id = $3",
        )
        .bind(label.as_str())
        .bind(score)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Scored rows whose outlier flag has not been computed yet, oldest first.
    pub async fn list_outlier_candidates(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM airport_feedback \
             WHERE sentiment_score IS NOT NULL AND outlier_checked_at IS NULL \
             ORDER BY id ASC LIMIT $1"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Set the outlier flag and mark the row as checked.
    ///
    /// Returns `false` if the row does not exist.
    pub async fn set_outlier(
        pool: &PgPool,
        id: DbId,
        is_outlier: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE airport_feedback \
             SET is_outlier = $1, outlier_checked_at = now() \
             WHERE id = $2",
        )
        .bind(is_outlier)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rows whose follow-up email has not been sent and that have failed
    /// fewer than `max_attempts` times.
    ///
    /// Rows with the fewest failures come first, so a few undeliverable
    /// addresses cannot starve the rest of the queue.
    pub async fn list_pending_follow_up(
        pool: &PgPool,
        limit: i64,
        max_attempts: i32,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM airport_feedback \
             WHERE email_sent = FALSE AND follow_up_attempts < $2 \
             ORDER BY follow_up_attempts ASC, id ASC LIMIT $1"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(limit)
            .bind(max_attempts)
            .fetch_all(pool)
            .await
    }

    /// Record that the staff alert for a row went out.
    pub async fn mark_staff_alert_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE airport_feedback \
             SET staff_alert_sent = TRUE \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that the follow-up email went out.
    pub async fn mark_email_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE airport_feedback \
             SET email_sent = TRUE, last_follow_up_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a failed follow-up delivery for a row.
    pub async fn record_follow_up_failure(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE airport_feedback \
             SET follow_up_attempts = follow_up_attempts + 1, last_follow_up_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
