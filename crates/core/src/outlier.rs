//! Detection of feedback whose star rating contradicts its comment.
//!
//! The rating is mapped onto the sentiment scale (`1 -> -1.0`, `5 -> 1.0`)
//! and compared with the comment's sentiment score. A gap wider than
//! [`OUTLIER_GAP_THRESHOLD`] marks the record as an outlier.

use crate::rating::{Rating, MAX_RATING, MIN_RATING};

/// Gaps strictly greater than this are outliers.
pub const OUTLIER_GAP_THRESHOLD: f64 = 1.0;

/// Map a rating linearly onto `[-1.0, 1.0]`.
pub fn normalize_rating(rating: Rating) -> f64 {
    let span = f64::from(MAX_RATING - MIN_RATING);
    (f64::from(rating.value() - MIN_RATING) / span) * 2.0 - 1.0
}

/// Absolute distance between the normalized rating and a sentiment score.
pub fn rating_gap(rating: Rating, sentiment_score: f64) -> f64 {
    (normalize_rating(rating) - sentiment_score).abs()
}

pub fn is_outlier(rating: Rating, sentiment_score: f64) -> bool {
    rating_gap(rating, sentiment_score) > OUTLIER_GAP_THRESHOLD
}
