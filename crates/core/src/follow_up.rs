//! Follow-up messages sent to passengers after their feedback is stored.
//!
//! Low ratings get an apology plus an internal staff alert; everything else
//! gets a short thank-you.

use crate::rating::Rating;

/// Ratings strictly below this trigger the apology path.
pub const APOLOGY_BELOW: u8 = 3;

/// Stand-in for the area list when the passenger picked none.
const NO_AREAS: &str = "experience";

/// A plain-text email, minus addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent {
    pub subject: String,
    pub body: String,
}

/// Messages to send for one feedback record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub passenger: MessageContent,
    pub staff_alert: Option<MessageContent>,
}

/// Join selected areas for use in a sentence.
pub fn describe_areas(areas: &[String]) -> String {
    if areas.is_empty() {
        NO_AREAS.to_string()
    } else {
        areas.join(", ")
    }
}

/// Compose the follow-up for a stored feedback record.
pub fn compose(name: &str, rating: Rating, areas: &[String], comments: &str) -> FollowUp {
    let areas = describe_areas(areas);

    if rating.value() < APOLOGY_BELOW {
        let passenger = MessageContent {
            subject: "We're sorry: Let us make it right".to_string(),
            body: format!(
                "Dear {name},\n\nWe noticed you weren't satisfied with the {areas}. \
                 Our team has been notified and will look into it.\n\nSafe travels."
            ),
        };
        let staff_alert = MessageContent {
            subject: format!("ACTION REQUIRED: {areas} Issue"),
            body: format!(
                "Staff Alert!\nPassenger: {name}\nRating: {rating}\nComment: {comments}"
            ),
        };
        FollowUp {
            passenger,
            staff_alert: Some(staff_alert),
        }
    } else {
        FollowUp {
            passenger: MessageContent {
                subject: "A quick thank you!".to_string(),
                body: format!(
                    "Hi {name}!\n\nThanks for the {rating}-star feedback on our {areas}!"
                ),
            },
            staff_alert: None,
        }
    }
}
