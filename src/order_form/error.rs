//! Error types for the order form.

use crate::store::StoreError;
use thiserror::Error;

/// Reasons a submit did not produce an order.
///
/// The messages are shown to the customer as they are.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    /// The customer name is empty or whitespace.
    #[error("Please enter your name!")]
    NameRequired,

    /// No datastore is configured for this form.
    #[error("The order service is not configured. Please ask the staff for help.")]
    StoreUnavailable,

    /// An ice-cream order without a single scoop.
    #[error("Please choose at least one scoop of ice cream or switch to \"drinks only\"!")]
    NoScoops,

    /// A drinks-only order without a drink.
    #[error("Please choose at least one drink!")]
    NoDrinks,

    /// Another submit of this form has not finished yet.
    #[error("Your order is already being sent.")]
    InFlight,

    /// The datastore rejected or never answered the insert.
    #[error("Sending the order failed. Please try again.")]
    Store(#[source] StoreError),
}

impl SubmitError {
    /// Validation problems are fixed by the customer and never logged.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SubmitError::NameRequired | SubmitError::NoScoops | SubmitError::NoDrinks
        )
    }
}
