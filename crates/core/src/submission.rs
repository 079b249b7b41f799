//! The snapshot posted to the persistence gateway when a session completes.

use serde::{Deserialize, Serialize};

use crate::category::{parse_categories, FeedbackCategory};
use crate::error::CoreError;
use crate::rating::Rating;
use crate::validation::{Contact, ContactRules, Field};

/// Request body of `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub rating: Rating,
    pub feedback_areas: Vec<FeedbackCategory>,
    pub comments: String,
}

impl FeedbackSubmission {
    /// Snapshot an in-progress session. Callers check validity first.
    pub fn snapshot(
        contact: &Contact,
        rating: Rating,
        feedback_areas: &[FeedbackCategory],
    ) -> Self {
        Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            rating,
            feedback_areas: feedback_areas.to_vec(),
            comments: contact.comments.clone(),
        }
    }

    /// Build a submission from untyped request fields, applying the same
    /// sanitization and validity rules as the wizard.
    pub fn from_raw(
        contact: &Contact,
        rating: i16,
        feedback_areas: &[String],
        rules: &ContactRules,
    ) -> Result<Self, CoreError> {
        let rating = Rating::try_from(rating)?;
        let feedback_areas = parse_categories(feedback_areas)?;

        let mut sanitized = Contact::default();
        for field in [Field::Name, Field::Phone, Field::Email, Field::Comments] {
            sanitized.update(field, contact.get(field));
        }
        rules.validate(&sanitized)?;

        Ok(Self::snapshot(&sanitized, rating, &feedback_areas))
    }

    /// Category identifiers in selection order, as stored.
    pub fn feedback_area_ids(&self) -> Vec<String> {
        self.feedback_areas
            .iter()
            .map(|c| c.as_str().to_string())
            .collect()
    }
}
