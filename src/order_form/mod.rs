//! # Order Form
//!
//! The customer-facing side: edit an [`OrderDraft`], submit it, see a confirmation.
//!
//! [`OrderForm`] is a cheap-to-clone handle. Every clone edits the same draft, the way
//! every button on a screen acts on the same form. Edits go through
//! [`OrderForm::edit`], which hands out the draft for one synchronous change.
//!
//! ## Submit
//!
//! Checks run in a fixed order, and the first failure wins:
//!
//! 1. the customer name is not blank ([`SubmitError::NameRequired`]),
//! 2. a datastore is configured ([`SubmitError::StoreUnavailable`]),
//! 3. the selection is complete ([`SubmitError::NoScoops`] / [`SubmitError::NoDrinks`]).
//!
//! Then exactly one insert is sent. While it is in flight, further submits return
//! [`SubmitError::InFlight`] without touching the datastore. This guard is local to the
//! form: two forms (two tablets) can still submit the same order twice.
//!
//! On success the draft is reset and the confirmation starts. On failure the draft stays
//! as it was so the customer can simply try again.

mod confirmation;
pub mod error;

pub use confirmation::{ConfirmationPhase, ConfirmationTimings};
pub use error::*;

use crate::model::{OrderDraft, OrderId};
use crate::store::Datastore;
use chrono::Utc;
use confirmation::Confirmation;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Default)]
struct FormState {
    draft: OrderDraft,
    submitting: bool,
    confirmation: Option<Confirmation>,
}

/// Shared handle to one order form.
#[derive(Clone)]
pub struct OrderForm {
    state: Arc<Mutex<FormState>>,
    store: Option<Arc<dyn Datastore>>,
    timings: ConfirmationTimings,
}

impl OrderForm {
    /// Creates an empty form. Without a store every submit fails with
    /// [`SubmitError::StoreUnavailable`] once the name is filled in.
    pub fn new(store: Option<Arc<dyn Datastore>>, timings: ConfirmationTimings) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            store,
            timings,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one change to the draft.
    ///
    /// ```ignore
    /// form.edit(|draft| draft.adjust_scoops(Flavor::Vanilla, 1));
    /// ```
    pub fn edit<R>(&self, change: impl FnOnce(&mut OrderDraft) -> R) -> R {
        change(&mut self.lock().draft)
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> OrderDraft {
        self.lock().draft.clone()
    }

    /// `true` while an insert is in flight; the submit button is disabled meanwhile.
    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// The confirmation currently on screen, if any.
    pub fn confirmation(&self) -> Option<ConfirmationPhase> {
        self.lock()
            .confirmation
            .and_then(|c| c.phase_at(Instant::now(), &self.timings))
    }

    /// Validates the draft and sends it to the datastore.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<OrderId, SubmitError> {
        let (store, order) = {
            let mut state = self.lock();
            if state.submitting {
                debug!("Submit ignored, previous submit still in flight");
                return Err(SubmitError::InFlight);
            }
            if state.draft.customer_name().trim().is_empty() {
                return Err(SubmitError::NameRequired);
            }
            let store = self.store.clone().ok_or(SubmitError::StoreUnavailable)?;
            check_selection(&state.draft)?;

            state.submitting = true;
            (store, state.draft.to_new_order(Utc::now()))
        };
        let _submitting = SubmittingGuard { form: self };

        debug!(?order, "Submitting order");
        let result = store.insert(order).await;

        match result {
            Ok(id) => {
                let mut state = self.lock();
                state.draft = OrderDraft::default();
                state.confirmation = Some(Confirmation::started(Instant::now()));
                info!(order_id = %id, "Order submitted");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "Failed to submit order");
                Err(SubmitError::Store(e))
            }
        }
    }
}

/// Either enough scoops for an ice-cream order, or at least one drink for a drinks-only order.
fn check_selection(draft: &OrderDraft) -> Result<(), SubmitError> {
    if draft.drinks_only() {
        if draft.drinks().is_empty() {
            return Err(SubmitError::NoDrinks);
        }
    } else if draft.total_scoops() == 0 {
        return Err(SubmitError::NoScoops);
    }
    Ok(())
}

/// Clears the submitting flag even if the submit future is dropped mid-flight.
struct SubmittingGuard<'a> {
    form: &'a OrderForm,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.form.lock().submitting = false;
    }
}
