//! Passenger rating and the presentation values derived from it.
//!
//! A [`Rating`] can only hold one of the five defined values, so the
//! derivations below ([`rating_theme`], [`rating_pose_parameters`]) are total
//! and never need to handle an out-of-domain input.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// Lowest selectable rating.
pub const MIN_RATING: u8 = 1;

/// Highest selectable rating.
pub const MAX_RATING: u8 = 5;

/// Rating a fresh session starts with.
pub const DEFAULT_RATING: u8 = 3;

/// A rating in `MIN_RATING..=MAX_RATING`.
///
/// Serialized as a bare integer. Deserializing an out-of-range value fails,
/// which is how the gateway rejects malformed submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Rating(u8);

impl Rating {
    /// Every valid rating, ascending.
    pub const ALL: [Rating; 5] = [Rating(1), Rating(2), Rating(3), Rating(4), Rating(5)];

    /// Build a rating, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::Validation(format!(
                "Rating {value} is out of range ({MIN_RATING}..{MAX_RATING})"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(DEFAULT_RATING)
    }
}

impl TryFrom<i16> for Rating {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| {
                CoreError::Validation(format!(
                    "Rating {value} is out of range ({MIN_RATING}..{MAX_RATING})"
                ))
            })
            .and_then(Rating::new)
    }
}

impl From<Rating> for i16 {
    fn from(rating: Rating) -> Self {
        i16::from(rating.0)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Theme key
// ---------------------------------------------------------------------------

/// Presentation theme derived from the rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeKey {
    Alert,
    Warning,
    Positive,
}

impl ThemeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Warning => "warning",
            Self::Positive => "positive",
        }
    }
}

/// Map a rating to its theme: 1-2 alert, 3 warning, 4-5 positive.
pub fn rating_theme(rating: Rating) -> ThemeKey {
    match rating.value() {
        0..=2 => ThemeKey::Alert,
        3 => ThemeKey::Warning,
        _ => ThemeKey::Positive,
    }
}

// ---------------------------------------------------------------------------
// Pose parameters
// ---------------------------------------------------------------------------

/// Offset and tilt of the rating indicator, purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoseParameters {
    pub vertical_offset: i32,
    pub rotation_degrees: i32,
}

/// Pose per rating, indexed by `rating - 1`.
const POSE_TABLE: [PoseParameters; 5] = [
    PoseParameters {
        vertical_offset: -50,
        rotation_degrees: -15,
    },
    PoseParameters {
        vertical_offset: -25,
        rotation_degrees: -30,
    },
    PoseParameters {
        vertical_offset: 0,
        rotation_degrees: -45,
    },
    PoseParameters {
        vertical_offset: -25,
        rotation_degrees: -60,
    },
    PoseParameters {
        vertical_offset: -50,
        rotation_degrees: -90,
    },
];

/// Look up the indicator pose for a rating.
pub fn rating_pose_parameters(rating: Rating) -> PoseParameters {
    POSE_TABLE[usize::from(rating.value() - MIN_RATING)]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
