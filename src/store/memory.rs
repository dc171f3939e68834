//! # In-Memory Datastore
//!
//! An actor that owns every stored [`OrderRow`] and a cloneable [`StoreClient`] that talks
//! to it over a channel.
//!
//! ## Key Types
//!
//! - [`MemoryStore`]: the server half. Owns the rows and processes requests one at a time.
//! - [`StoreRequest`]: the messages the client sends.
//! - [`StoreClient`]: the [`Datastore`] implementation handed to forms and kitchen views.
//!
//! Rows are kept in their persisted shape. The client serializes on insert and parses on
//! select, exactly like it would when talking to a hosted store.

use crate::model::{NewOrder, OrderId, OrderRecord, OrderRow};
use crate::store::{Datastore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

// =============================================================================
// 1. THE MESSAGES
// =============================================================================

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Requests the [`MemoryStore`] understands. One variant per [`Datastore`] operation.
#[derive(Debug)]
pub enum StoreRequest {
    Insert {
        row: OrderRow,
        respond_to: Response<OrderId>,
    },
    SelectAll {
        respond_to: Response<Vec<OrderRow>>,
    },
    DeleteById {
        id: OrderId,
        respond_to: Response<()>,
    },
    DeleteOlderThan {
        cutoff: DateTime<Utc>,
        respond_to: Response<usize>,
    },
}

// =============================================================================
// 2. THE STORE ACTOR
// =============================================================================

struct StoredRow {
    seq: u64,
    row: OrderRow,
}

/// The actor that owns the order table.
///
/// # Architecture Note
/// Every kitchen screen and every order form holds a [`StoreClient`], but only this task
/// touches the rows. Requests are handled strictly one after another, so no `Mutex` is
/// needed around the table and a purge can never interleave with an insert.
pub struct MemoryStore {
    receiver: mpsc::Receiver<StoreRequest>,
    rows: HashMap<OrderId, StoredRow>,
    next_id: u64,
}

impl MemoryStore {
    /// Creates the store and its client.
    ///
    /// `buffer_size` is the channel capacity; when it is full, client calls wait.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            rows: HashMap::new(),
            next_id: 1,
        };
        (store, StoreClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        info!("Order store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert { mut row, respond_to } => {
                    let seq = self.next_id;
                    self.next_id += 1;
                    let id = OrderId(format!("order_{seq}"));
                    row.id = Some(id.clone());
                    debug!(order_id = %id, customer = %row.customer_name, "Insert");
                    self.rows.insert(id.clone(), StoredRow { seq, row });
                    info!(order_id = %id, size = self.rows.len(), "Order stored");
                    let _ = respond_to.send(Ok(id));
                }
                StoreRequest::SelectAll { respond_to } => {
                    let mut stored: Vec<&StoredRow> = self.rows.values().collect();
                    // Newest first; equal timestamps fall back to insertion order
                    stored.sort_by(|a, b| {
                        b.row
                            .created_at
                            .cmp(&a.row.created_at)
                            .then_with(|| b.seq.cmp(&a.seq))
                    });
                    let rows: Vec<OrderRow> = stored.into_iter().map(|s| s.row.clone()).collect();
                    debug!(count = rows.len(), "SelectAll");
                    let _ = respond_to.send(Ok(rows));
                }
                StoreRequest::DeleteById { id, respond_to } => {
                    if self.rows.remove(&id).is_some() {
                        info!(order_id = %id, size = self.rows.len(), "Order deleted");
                    } else {
                        debug!(order_id = %id, "Order already gone");
                    }
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::DeleteOlderThan { cutoff, respond_to } => {
                    let before = self.rows.len();
                    self.rows.retain(|_, stored| stored.row.created_at >= cutoff);
                    let removed = before - self.rows.len();
                    if removed > 0 {
                        info!(%cutoff, removed, size = self.rows.len(), "Stale orders purged");
                    } else {
                        debug!(%cutoff, "Nothing to purge");
                    }
                    let _ = respond_to.send(Ok(removed));
                }
            }
        }

        info!(size = self.rows.len(), "Order store shut down");
    }
}

// =============================================================================
// 3. THE CLIENT
// =============================================================================

/// Cheap-to-clone handle to a running [`MemoryStore`].
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

#[async_trait]
impl Datastore for StoreClient {
    #[instrument(skip(self, order), fields(customer = %order.customer_name))]
    async fn insert(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        debug!(?order, "Sending insert");
        let row = OrderRow::from_new(&order)?;
        self.request(|respond_to| StoreRequest::Insert { row, respond_to })
            .await
    }

    async fn select_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        let rows = self
            .request(|respond_to| StoreRequest::SelectAll { respond_to })
            .await?;
        rows.into_iter()
            .map(|row| row.into_record().map_err(StoreError::from))
            .collect()
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &OrderId) -> Result<(), StoreError> {
        let id = id.clone();
        self.request(|respond_to| StoreRequest::DeleteById { id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::DeleteOlderThan { cutoff, respond_to })
            .await
            .map(|_removed| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn order_at(name: &str, created_at: DateTime<Utc>) -> NewOrder {
        NewOrder {
            customer_name: name.to_string(),
            flavors: Vec::new(),
            toppings: Vec::new(),
            drinks: vec!["Cola".to_string()],
            coffee_type: None,
            remarks: String::new(),
            created_at,
            drinks_only: true,
        }
    }

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let (store, client) = MemoryStore::new(8);
        let handle = tokio::spawn(store.run());
        let now = Utc::now();

        // 1. Insert assigns sequential ids
        let first = client.insert(order_at("Anna", now - Duration::minutes(2))).await.unwrap();
        let second = client.insert(order_at("Ben", now)).await.unwrap();
        assert_eq!(first, OrderId::from("order_1"));
        assert_eq!(second, OrderId::from("order_2"));

        // 2. Select returns newest first, parsed back into records
        let orders = client.select_all().await.unwrap();
        let names: Vec<&str> = orders.iter().map(|o| o.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Ben", "Anna"]);
        assert_eq!(orders[0].drinks, vec!["Cola".to_string()]);

        // 3. Delete by id, twice
        client.delete_by_id(&first).await.unwrap();
        client.delete_by_id(&first).await.unwrap();
        assert_eq!(client.select_all().await.unwrap().len(), 1);

        // 4. Shutdown when the last client is gone
        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_purge_is_strictly_older_than_cutoff() {
        let (store, client) = MemoryStore::new(8);
        tokio::spawn(store.run());
        let cutoff = Utc::now() - Duration::minutes(30);

        client.insert(order_at("stale", cutoff - Duration::seconds(1))).await.unwrap();
        client.insert(order_at("boundary", cutoff)).await.unwrap();
        client.insert(order_at("fresh", cutoff + Duration::seconds(1))).await.unwrap();

        client.delete_older_than(cutoff).await.unwrap();

        let names: Vec<String> = client
            .select_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.customer_name)
            .collect();
        assert_eq!(names, vec!["fresh".to_string(), "boundary".to_string()]);
    }

    #[tokio::test]
    async fn test_closed_store_reports_error() {
        let (store, client) = MemoryStore::new(1);
        drop(store);

        let result = client.select_all().await;
        assert_eq!(result, Err(StoreError::Closed));
    }
}
