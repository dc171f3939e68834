//! Persisted shape of an order.
//!
//! Column names are snake_case and the sequences (`flavors`, `toppings`, `drinks`) are
//! stored as JSON text. Rows written by older clients may leave any of the optional
//! columns `null`; reading falls back to empty values in that case.

use crate::model::{FlavorPortion, NewOrder, OrderId, OrderRecord};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub flavors: Option<String>,
    #[serde(default)]
    pub toppings: Option<String>,
    #[serde(default)]
    pub drinks: Option<String>,
    #[serde(default)]
    pub coffee_type: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub drinks_only: Option<bool>,
}

impl OrderRow {
    /// Serializes a new order for insertion. The row has no id yet.
    pub fn from_new(order: &NewOrder) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: None,
            customer_name: order.customer_name.clone(),
            flavors: Some(serde_json::to_string(&order.flavors)?),
            toppings: Some(serde_json::to_string(&order.toppings)?),
            drinks: Some(serde_json::to_string(&order.drinks)?),
            coffee_type: order.coffee_type.clone(),
            remarks: Some(order.remarks.clone()),
            created_at: order.created_at,
            drinks_only: Some(order.drinks_only),
        })
    }

    /// Parses a stored row back into a record.
    ///
    /// Fails if the row carries no id or one of the sequence columns is not valid JSON.
    pub fn into_record(self) -> Result<OrderRecord, RowError> {
        let id = self.id.ok_or(RowError::MissingId)?;
        let flavors: Vec<FlavorPortion> = parse_sequence(self.flavors.as_deref())?;
        Ok(OrderRecord {
            id,
            customer_name: self.customer_name,
            flavors,
            toppings: parse_sequence(self.toppings.as_deref())?,
            drinks: parse_sequence(self.drinks.as_deref())?,
            coffee_type: self.coffee_type.filter(|kind| !kind.is_empty()),
            remarks: self.remarks.unwrap_or_default(),
            created_at: self.created_at,
            drinks_only: self.drinks_only.unwrap_or(false),
        })
    }
}

/// Errors turning a stored row into an [`OrderRecord`].
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("Row has no id")]
    MissingId,
    #[error("Malformed sequence column: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn parse_sequence<T: DeserializeOwned>(text: Option<&str>) -> Result<Vec<T>, serde_json::Error> {
    match text {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str::<Option<Vec<T>>>(text)?.unwrap_or_default()),
    }
}
