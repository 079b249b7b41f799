use aerofeedback_core::follow_up::{compose, MessageContent};
use aerofeedback_core::types::DbId;
use aerofeedback_db::models::feedback::Feedback;
use aerofeedback_db::repositories::FeedbackRepo;
use aerofeedback_db::DbPool;

use super::stored_rating;
use crate::delivery::{EmailError, Mailer};

/// Send follow-ups for up to `batch_size` rows that have not had one.
///
/// A row is marked sent once the passenger email is delivered. The staff
/// alert goes out at most once per row, and a failed alert does not hold
/// back the passenger's email. Each failed passenger email counts as an
/// attempt; rows that reach `max_attempts` are no longer picked up.
///
/// Returns the number of rows marked sent.
pub async fn run(
    pool: &DbPool,
    mailer: &dyn Mailer,
    staff_alert_email: Option<&str>,
    batch_size: i64,
    max_attempts: i32,
) -> Result<usize, sqlx::Error> {
    let rows = FeedbackRepo::list_pending_follow_up(pool, batch_size, max_attempts).await?;
    let mut sent = 0;

    for row in &rows {
        if let Err(e) = send_for_row(pool, mailer, staff_alert_email, row).await {
            let attempt = row.follow_up_attempts + 1;
            tracing::error!(feedback_id = row.id, attempt, error = %e, "Failed to send follow-up");
            record_failure(pool, row.id).await;
            if attempt >= max_attempts {
                tracing::warn!(feedback_id = row.id, attempt, "Giving up on follow-up email");
            }
            continue;
        }

        match FeedbackRepo::mark_email_sent(pool, row.id).await {
            Ok(_) => sent += 1,
            Err(e) => {
                tracing::error!(feedback_id = row.id, error = %e, "Failed to mark follow-up sent");
            }
        }
    }

    if sent > 0 {
        tracing::info!(count = sent, "Follow-up pass complete");
    }
    Ok(sent)
}

async fn send_for_row(
    pool: &DbPool,
    mailer: &dyn Mailer,
    staff_alert_email: Option<&str>,
    row: &Feedback,
) -> Result<(), EmailError> {
    let Some(rating) = stored_rating(row) else {
        return Err(EmailError::Build(format!("invalid rating {}", row.rating)));
    };
    let follow_up = compose(&row.name, rating, &row.feedback_areas, &row.comments);

    if !row.staff_alert_sent {
        if let Some(alert) = &follow_up.staff_alert {
            send_staff_alert(pool, mailer, staff_alert_email, row.id, alert).await;
        }
    }

    mailer.send(&row.email, &follow_up.passenger).await
}

/// Deliver a low-rating alert and record it, so later retries of the
/// passenger email do not repeat it.
async fn send_staff_alert(
    pool: &DbPool,
    mailer: &dyn Mailer,
    staff_alert_email: Option<&str>,
    id: DbId,
    alert: &MessageContent,
) {
    let Some(to) = staff_alert_email else {
        tracing::warn!(
            feedback_id = id,
            "Low rating but STAFF_ALERT_EMAIL is not set; alert skipped"
        );
        return;
    };

    if let Err(e) = mailer.send(to, alert).await {
        tracing::error!(feedback_id = id, error = %e, "Failed to send staff alert");
        return;
    }
    if let Err(e) = FeedbackRepo::mark_staff_alert_sent(pool, id).await {
        tracing::error!(feedback_id = id, error = %e, "Failed to mark staff alert sent");
    }
}

async fn record_failure(pool: &DbPool, id: DbId) {
    if let Err(e) = FeedbackRepo::record_follow_up_failure(pool, id).await {
        tracing::error!(feedback_id = id, error = %e, "Failed to record follow-up attempt");
    }
}
