//! The fixed list of feedback categories a passenger can flag.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An area of the airport experience the passenger wants improved.
///
/// The wire and database representation is the human-readable identifier
/// (e.g. `"Safety & Security"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackCategory {
    #[serde(rename = "Check-in & Immigration")]
    CheckInImmigration,
    #[serde(rename = "Comfort & Facilities")]
    ComfortFacilities,
    #[serde(rename = "Information & Communication")]
    InformationCommunication,
    #[serde(rename = "Service Quality & Staff")]
    ServiceQualityStaff,
    #[serde(rename = "Safety & Security")]
    SafetySecurity,
    #[serde(rename = "Retail & Food Services")]
    RetailFoodServices,
}

impl FeedbackCategory {
    /// All categories in display order.
    pub const ALL: [FeedbackCategory; 6] = [
        Self::CheckInImmigration,
        Self::ComfortFacilities,
        Self::InformationCommunication,
        Self::ServiceQualityStaff,
        Self::SafetySecurity,
        Self::RetailFoodServices,
    ];

    /// The category identifier as stored and transmitted.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckInImmigration => "Check-in & Immigration",
            Self::ComfortFacilities => "Comfort & Facilities",
            Self::InformationCommunication => "Information & Communication",
            Self::ServiceQualityStaff => "Service Quality & Staff",
            Self::SafetySecurity => "Safety & Security",
            Self::RetailFoodServices => "Retail & Food Services",
        }
    }

    /// Parse a category identifier.
    pub fn from_id(id: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == id)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown feedback category '{id}'. Must be one of: {:?}",
                    Self::ALL.map(Self::as_str)
                ))
            })
    }
}

impl std::fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a list of identifiers, keeping the first occurrence of each.
pub fn parse_categories(ids: &[String]) -> Result<Vec<FeedbackCategory>, CoreError> {
    let mut parsed: Vec<FeedbackCategory> = Vec::with_capacity(ids.len());
    for id in ids {
        let category = FeedbackCategory::from_id(id)?;
        if !parsed.contains(&category) {
            parsed.push(category);
        }
    }
    Ok(parsed)
}
