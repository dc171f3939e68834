//! # Mock Datastore
//!
//! Utilities for testing the order form and the kitchen view in isolation.
//!
//! [`MockDatastore`] answers each call with the next queued expectation and records every
//! call it receives. Use the `expect_*` builders to queue responses, [`MockDatastore::calls`]
//! to inspect what was sent, and [`MockDatastore::verify`] to make sure nothing queued
//! was left unused.
//!
//! # Example
//! ```ignore
//! let mock = MockDatastore::new();
//! mock.expect_insert().return_ok(OrderId::from("order_1"));
//! mock.expect_select_all().return_err(StoreError::Request("offline".into()));
//!
//! let store: Arc<dyn Datastore> = Arc::new(mock.clone());
//! // ... exercise the component ...
//! mock.verify();
//! ```

use crate::model::{NewOrder, OrderId, OrderRecord};
use crate::store::{Datastore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// EXPECTATIONS
// =============================================================================

enum Expectation {
    Insert {
        response: Result<OrderId, StoreError>,
        delay: Option<Duration>,
    },
    SelectAll {
        response: Result<Vec<OrderRecord>, StoreError>,
        delay: Option<Duration>,
    },
    DeleteById {
        id: OrderId,
        response: Result<(), StoreError>,
    },
    DeleteOlderThan {
        response: Result<(), StoreError>,
    },
}

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert(NewOrder),
    SelectAll,
    DeleteById(OrderId),
    DeleteOlderThan(DateTime<Utc>),
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<Call>,
}

/// A [`Datastore`] driven by queued expectations.
///
/// Clones share the same queue and call log, so keep one clone in the test and hand
/// another to the component under test.
#[derive(Clone, Default)]
pub struct MockDatastore {
    state: Arc<Mutex<MockState>>,
}

impl MockDatastore {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects an `insert`.
    pub fn expect_insert(&self) -> InsertExpectationBuilder {
        InsertExpectationBuilder {
            state: self.state.clone(),
            delay: None,
        }
    }

    /// Expects a `select_all`.
    pub fn expect_select_all(&self) -> SelectAllExpectationBuilder {
        SelectAllExpectationBuilder {
            state: self.state.clone(),
            delay: None,
        }
    }

    /// Expects a `delete_by_id` for `id`.
    pub fn expect_delete_by_id(&self, id: impl Into<OrderId>) -> DeleteByIdExpectationBuilder {
        DeleteByIdExpectationBuilder {
            state: self.state.clone(),
            id: id.into(),
        }
    }

    /// Expects a `delete_older_than`.
    pub fn expect_delete_older_than(&self) -> DeleteOlderThanExpectationBuilder {
        DeleteOlderThanExpectationBuilder {
            state: self.state.clone(),
        }
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Payloads of all `insert` calls received so far.
    pub fn inserted(&self) -> Vec<NewOrder> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Insert(order) => Some(order),
                _ => None,
            })
            .collect()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!("Not all expectations were met. {} remaining", state.expectations.len());
        }
    }

    /// Records the call and pops the expectation that answers it.
    fn next(&self, call: Call) -> Expectation {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        match state.expectations.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected datastore call: {call:?}"),
        }
    }
}

#[async_trait]
impl Datastore for MockDatastore {
    async fn insert(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        match self.next(Call::Insert(order)) {
            Expectation::Insert { response, delay } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            _ => panic!("Expectation mismatch: got insert"),
        }
    }

    async fn select_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        match self.next(Call::SelectAll) {
            Expectation::SelectAll { response, delay } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            _ => panic!("Expectation mismatch: got select_all"),
        }
    }

    async fn delete_by_id(&self, id: &OrderId) -> Result<(), StoreError> {
        match self.next(Call::DeleteById(id.clone())) {
            Expectation::DeleteById { id: expected, response } => {
                assert_eq!(&expected, id, "delete_by_id called with unexpected id");
                response
            }
            _ => panic!("Expectation mismatch: got delete_by_id"),
        }
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError> {
        match self.next(Call::DeleteOlderThan(cutoff)) {
            Expectation::DeleteOlderThan { response } => response,
            _ => panic!("Expectation mismatch: got delete_older_than"),
        }
    }
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Builder for `insert` expectations.
pub struct InsertExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl InsertExpectationBuilder {
    /// Holds the response back for `delay`, simulating a slow store.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, id: impl Into<OrderId>) {
        self.push(Ok(id.into()));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<OrderId, StoreError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation::Insert {
            response,
            delay: self.delay,
        });
    }
}

/// Builder for `select_all` expectations.
pub struct SelectAllExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl SelectAllExpectationBuilder {
    /// Holds the response back for `delay`, simulating a slow store.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, orders: Vec<OrderRecord>) {
        self.push(Ok(orders));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Vec<OrderRecord>, StoreError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation::SelectAll {
            response,
            delay: self.delay,
        });
    }
}

/// Builder for `delete_by_id` expectations.
pub struct DeleteByIdExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    id: OrderId,
}

impl DeleteByIdExpectationBuilder {
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), StoreError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation::DeleteById {
            id: self.id,
            response,
        });
    }
}

/// Builder for `delete_older_than` expectations.
pub struct DeleteOlderThanExpectationBuilder {
    state: Arc<Mutex<MockState>>,
}

impl DeleteOlderThanExpectationBuilder {
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), StoreError>) {
        let mut state = self.state.lock().unwrap();
        state
            .expectations
            .push_back(Expectation::DeleteOlderThan { response });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_with_expectations() {
        let mock = MockDatastore::new();
        mock.expect_select_all().return_ok(Vec::new());
        mock.expect_delete_by_id("order_3").return_err(StoreError::Closed);

        let store: Arc<dyn Datastore> = Arc::new(mock.clone());
        assert_eq!(store.select_all().await, Ok(Vec::new()));
        assert_eq!(
            store.delete_by_id(&OrderId::from("order_3")).await,
            Err(StoreError::Closed)
        );

        assert_eq!(
            mock.calls(),
            vec![Call::SelectAll, Call::DeleteById(OrderId::from("order_3"))]
        );
        mock.verify();
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_reports_unused_expectations() {
        let mock = MockDatastore::new();
        mock.expect_delete_older_than().return_ok();
        mock.verify();
    }
}
