//! Represents a submitted order as the kitchen sees it.
//!
//! Records are write-once: the datastore assigns the [`OrderId`] on insert, the kitchen
//! reads them over and over, and they disappear through a manual delete or the
//! age-based cleanup. There is no update path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// Opaque identifier assigned by the datastore.
///
/// Hosted stores hand out numbers or UUIDs, the in-memory store hands out `order_<n>`;
/// all of them are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => OrderId(id),
            RawId::Number(id) => OrderId(id.to_string()),
        })
    }
}

/// One flavor line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorPortion {
    pub name: String,
    pub scoops: u32,
}

impl FlavorPortion {
    pub fn new(name: impl Into<String>, scoops: u32) -> Self {
        Self {
            name: name.into(),
            scoops,
        }
    }
}

/// Payload for creating a new order record. The id is assigned by the datastore.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub flavors: Vec<FlavorPortion>,
    pub toppings: Vec<String>,
    pub drinks: Vec<String>,
    pub coffee_type: Option<String>,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub drinks_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_name: String,
    pub flavors: Vec<FlavorPortion>,
    pub toppings: Vec<String>,
    pub drinks: Vec<String>,
    pub coffee_type: Option<String>,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub drinks_only: bool,
}

impl OrderRecord {
    /// Attaches the datastore id to a submitted payload.
    pub fn from_new(id: OrderId, order: NewOrder) -> Self {
        Self {
            id,
            customer_name: order.customer_name,
            flavors: order.flavors,
            toppings: order.toppings,
            drinks: order.drinks,
            coffee_type: order.coffee_type,
            remarks: order.remarks,
            created_at: order.created_at,
            drinks_only: order.drinks_only,
        }
    }

    /// Time since the order was placed. Negative if the submitting clock ran ahead.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }
}
