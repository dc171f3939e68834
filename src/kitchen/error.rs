//! Error types for the kitchen view.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum KitchenError {
    /// No datastore is configured for this view.
    #[error("Order service is not configured")]
    StoreUnavailable,

    /// A datastore request failed. The board keeps showing what it had.
    #[error("Datastore error: {0}")]
    Store(#[from] StoreError),
}
