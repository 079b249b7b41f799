//! Airport feedback entity model and DTOs.

use aerofeedback_core::types::{DbId, Timestamp};
use aerofeedback_core::validation::Contact;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `airport_feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub rating: i16,
    pub feedback_areas: Vec<String>,
    pub comments: String,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
    pub is_outlier: bool,
    pub email_sent: bool,
    pub staff_alert_sent: bool,
    /// Failed passenger deliveries so far.
    pub follow_up_attempts: i32,
    pub last_follow_up_at: Option<Timestamp>,
    /// `NULL` until the outlier flag has been computed for the current score.
    pub outlier_checked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for submitting feedback.
///
/// `rating` is a plain integer and `feedback_areas` are plain strings, so
/// out-of-range ratings and unknown categories are reported by the
/// validation layer. A body with missing or mistyped fields never gets that
/// far and is refused by the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct CreateFeedback {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub rating: i16,
    #[serde(default)]
    pub feedback_areas: Vec<String>,
    #[serde(default)]
    pub comments: String,
}

impl CreateFeedback {
    pub fn contact(&self) -> Contact {
        Contact {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            comments: self.comments.clone(),
        }
    }
}
