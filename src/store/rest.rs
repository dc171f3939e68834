//! # Hosted Datastore
//!
//! [`RestDatastore`] talks to an `orders` table exposed through a PostgREST-style HTTP API
//! (`/rest/v1/<table>`), the way a hosted Postgres service publishes it.
//!
//! | Operation | Request |
//! |---|---|
//! | insert | `POST /rest/v1/orders` with `Prefer: return=representation` |
//! | select_all | `GET /rest/v1/orders?select=*&order=created_at.desc` |
//! | delete_by_id | `DELETE /rest/v1/orders?id=eq.<id>` |
//! | delete_older_than | `DELETE /rest/v1/orders?created_at=lt.<rfc3339>` |
//!
//! Every request carries the project key both as `apikey` header and as bearer token.

use crate::model::{NewOrder, OrderId, OrderRecord, OrderRow};
use crate::store::{Datastore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use tracing::{debug, instrument};

pub struct RestDatastore {
    http: reqwest::Client,
    endpoint: String,
    api_key: Secret<String>,
}

impl RestDatastore {
    pub fn new(base_url: &str, table: &str, api_key: Secret<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: table_endpoint(base_url, table),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        self.http
            .request(method, &self.endpoint)
            .header("apikey", key.as_str())
            .bearer_auth(key)
    }
}

fn table_endpoint(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

fn id_filter(id: &OrderId) -> String {
    format!("eq.{id}")
}

fn older_than_filter(cutoff: DateTime<Utc>) -> String {
    format!("lt.{}", cutoff.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Returns the body of a successful response, or the status and body as an error.
async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Datastore for RestDatastore {
    #[instrument(skip(self, order), fields(customer = %order.customer_name))]
    async fn insert(&self, order: NewOrder) -> Result<OrderId, StoreError> {
        let row = OrderRow::from_new(&order)?;
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;
        let stored: Vec<OrderRow> = serde_json::from_str(&read_body(response).await?)?;
        let id = stored
            .into_iter()
            .next()
            .and_then(|row| row.id)
            .ok_or(StoreError::MissingId)?;
        debug!(order_id = %id, "Order inserted");
        Ok(id)
    }

    async fn select_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        let rows: Vec<OrderRow> = serde_json::from_str(&read_body(response).await?)?;
        rows.into_iter()
            .map(|row| row.into_record().map_err(StoreError::from))
            .collect()
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &OrderId) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE)
            .query(&[("id", id_filter(id))])
            .send()
            .await?;
        read_body(response).await.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE)
            .query(&[("created_at", older_than_filter(cutoff))])
            .send()
            .await?;
        read_body(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_table() {
        let store = RestDatastore::new(
            "https://example.supabase.co/",
            "orders",
            Secret::new("anon".to_string()),
        );
        assert_eq!(store.endpoint(), "https://example.supabase.co/rest/v1/orders");
    }

    #[test]
    fn test_filters() {
        assert_eq!(id_filter(&OrderId::from("17")), "eq.17");

        let cutoff: DateTime<Utc> = "2026-07-04T13:33:00Z".parse().unwrap();
        assert_eq!(older_than_filter(cutoff), "lt.2026-07-04T13:33:00.000Z");
    }
}
