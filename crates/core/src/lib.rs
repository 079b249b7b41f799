//! Airport feedback domain rules.
//!
//! Pure, I/O-free building blocks shared by the gateway service, the
//! wizard controller and the post-processing worker:
//!
//! - [`rating`] -- the 1..=5 rating value plus its theme key and pose table.
//! - [`category`] -- the fixed feedback category list.
//! - [`validation`] -- field sanitization and contact validity predicates.
//! - [`submission`] -- the request body posted to the gateway.
//! - [`sentiment`], [`outlier`], [`follow_up`] -- rules applied to stored
//!   feedback after submission.

pub mod category;
pub mod error;
pub mod follow_up;
pub mod outlier;
pub mod rating;
pub mod sentiment;
pub mod submission;
pub mod types;
pub mod validation;
