//! Lexicon-based sentiment scoring for free-text comments.
//!
//! The score is the mean polarity of the recognised words in a comment, in
//! `[-1.0, 1.0]`. A negator (`not`, `never`, ...) flips the sign of the next
//! recognised word. Comments with no recognised words score `0.0`.

use serde::{Deserialize, Serialize};

/// Scores above this are labelled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Scores below this are labelled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "isnt", "wasnt", "dont", "didnt", "wont", "cant", "hardly",
];

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("amazing", 0.9),
    ("awesome", 0.9),
    ("excellent", 1.0),
    ("perfect", 1.0),
    ("wonderful", 1.0),
    ("great", 0.8),
    ("fantastic", 0.9),
    ("good", 0.7),
    ("nice", 0.6),
    ("clean", 0.4),
    ("comfortable", 0.5),
    ("friendly", 0.5),
    ("helpful", 0.5),
    ("polite", 0.5),
    ("fast", 0.3),
    ("quick", 0.3),
    ("smooth", 0.4),
    ("easy", 0.4),
    ("efficient", 0.5),
    ("pleasant", 0.6),
    ("love", 0.5),
    ("loved", 0.7),
    ("thanks", 0.2),
    ("happy", 0.8),
    ("safe", 0.5),
    ("best", 1.0),
    // negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("poor", -0.4),
    ("dirty", -0.6),
    ("rude", -0.3),
    ("slow", -0.3),
    ("late", -0.3),
    ("delayed", -0.4),
    ("crowded", -0.4),
    ("confusing", -0.5),
    ("lost", -0.4),
    ("broken", -0.4),
    ("unhelpful", -0.5),
    ("expensive", -0.5),
    ("uncomfortable", -0.5),
    ("long", -0.05),
    ("angry", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("hate", -0.8),
    ("unsafe", -0.5),
    ("smelly", -0.5),
];

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Coarse sentiment bucket stored alongside the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Bucket a score: `> 0.1` positive, `< -0.1` negative, else neutral.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Self::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Result of analysing one comment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

fn polarity(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, p)| *p)
}

/// Mean polarity of the recognised words in `text`.
pub fn score_comment(text: &str) -> f64 {
    let mut total = 0.0;
    let mut matched = 0usize;
    let mut negate = false;

    let words = text
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(|w| w.replace('\'', "").to_lowercase());

    for word in words {
        if NEGATORS.contains(&word.as_str()) {
            negate = true;
            continue;
        }
        if let Some(p) = polarity(&word) {
            total += if negate { -p } else { p };
            matched += 1;
            negate = false;
        }
    }

    if matched == 0 {
        return 0.0;
    }
    (total / matched as f64).clamp(-1.0, 1.0)
}

/// Score and label a comment. Blank comments are neutral.
pub fn analyze(comment: &str) -> Sentiment {
    if comment.trim().is_empty() {
        return Sentiment {
            label: SentimentLabel::Neutral,
            score: 0.0,
        };
    }
    let score = score_comment(comment);
    Sentiment {
        label: SentimentLabel::from_score(score),
        score,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
