//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope; creations add a human-readable
//! `message` next to the stored record.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ..., "data": T }` envelope returned with `201 Created`.
#[derive(Debug, Serialize)]
pub struct CreatedResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
}
