//! # Datastore Errors
//!
//! One error type for every [`Datastore`](super::Datastore) backend, so the form and the
//! kitchen handle failures the same way no matter where the orders live.

use crate::model::RowError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Datastore closed")]
    Closed,
    #[error("Datastore dropped response channel")]
    Dropped,
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed order data: {0}")]
    Decode(String),
    #[error("Datastore returned no id for the inserted order")]
    MissingId,
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Request(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

impl From<RowError> for StoreError {
    fn from(e: RowError) -> Self {
        StoreError::Decode(e.to_string())
    }
}
