//! # Datastore
//!
//! The order form and the kitchen view never talk to a database directly. They talk to a
//! [`Datastore`]: four operations, nothing else.
//!
//! | Operation | Used by |
//! |---|---|
//! | [`insert`](Datastore::insert) | order form submit |
//! | [`select_all`](Datastore::select_all) | kitchen refresh loop |
//! | [`delete_by_id`](Datastore::delete_by_id) | kitchen manual delete |
//! | [`delete_older_than`](Datastore::delete_older_than) | kitchen cleanup loop |
//!
//! ## Implementations
//!
//! - [`memory`]: an in-process store actor. One task owns all rows, clients send it
//!   messages. Default backend and the one the integration tests run against.
//! - [`rest`]: a client for a hosted PostgREST-style `orders` table.
//! - [`mock`]: expectation-driven fake for tests that need failures or slow responses.
//!
//! Concurrency control between several kitchen screens is entirely the store's job;
//! callers hold no locks across a datastore call.

pub mod error;
pub mod memory;
pub mod mock;
pub mod rest;

pub use error::StoreError;
pub use memory::{MemoryStore, StoreClient};
pub use rest::RestDatastore;

use crate::model::{NewOrder, OrderId, OrderRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The narrow interface between the UI components and whatever stores the orders.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Stores a new order and returns the id the store assigned to it.
    async fn insert(&self, order: NewOrder) -> Result<OrderId, StoreError>;

    /// All stored orders, newest first.
    async fn select_all(&self) -> Result<Vec<OrderRecord>, StoreError>;

    /// Removes one order. Removing an id that is already gone succeeds.
    async fn delete_by_id(&self, id: &OrderId) -> Result<(), StoreError>;

    /// Removes every order with `created_at` strictly before `cutoff`.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError>;
}
