//! Post-processing worker for stored airport feedback.
//!
//! Runs sentiment analysis, outlier flagging and follow-up email delivery
//! over the `airport_feedback` table on a fixed interval.

pub mod config;
pub mod delivery;
pub mod jobs;
pub mod runner;
