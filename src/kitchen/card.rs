//! What a single order looks like on the kitchen board.

use crate::model::{OrderId, OrderRecord, COFFEE_DRINK};
use chrono::{DateTime, Local, Utc};

/// Categorical age of an order: `"just now"`, `"1 minute"`, `"<n> minutes"`.
///
/// Whole minutes, rounded down. Timestamps from the future count as "just now".
pub fn elapsed_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes();
    match minutes {
        m if m < 1 => "just now".to_string(),
        1 => "1 minute".to_string(),
        m => format!("{m} minutes"),
    }
}

/// Board header, e.g. `"1 order"` or `"4 orders"`.
pub fn orders_label(count: usize) -> String {
    if count == 1 {
        "1 order".to_string()
    } else {
        format!("{count} orders")
    }
}

/// Render-ready view of one [`OrderRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCard {
    pub id: OrderId,
    pub customer_name: String,
    /// Local wall-clock time the order was placed, `HH:MM:SS`.
    pub placed_at: String,
    pub elapsed: String,
    /// `"<n>x <flavor>"` lines; empty for drinks-only orders.
    pub ice_cream: Vec<String>,
    /// Empty for drinks-only orders.
    pub toppings: Vec<String>,
    /// The coffee drink shows the chosen preparation when there is one.
    pub drinks: Vec<String>,
    pub drinks_only: bool,
    pub remarks: Option<String>,
}

impl OrderCard {
    pub fn from_record(record: &OrderRecord, now: DateTime<Utc>) -> Self {
        let (ice_cream, toppings) = if record.drinks_only {
            (Vec::new(), Vec::new())
        } else {
            (
                record
                    .flavors
                    .iter()
                    .map(|flavor| format!("{}x {}", flavor.scoops, flavor.name))
                    .collect(),
                record.toppings.clone(),
            )
        };

        let drinks = record
            .drinks
            .iter()
            .map(|drink| match &record.coffee_type {
                Some(coffee) if drink == COFFEE_DRINK => coffee.clone(),
                _ => drink.clone(),
            })
            .collect();

        Self {
            id: record.id.clone(),
            customer_name: record.customer_name.clone(),
            placed_at: record
                .created_at
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string(),
            elapsed: elapsed_label(record.created_at, now),
            ice_cream,
            toppings,
            drinks,
            drinks_only: record.drinks_only,
            remarks: Some(record.remarks.clone()).filter(|r| !r.is_empty()),
        }
    }

    pub fn shows_ice_cream(&self) -> bool {
        !self.ice_cream.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FlavorPortion;
    use chrono::Duration;

    fn record(drinks_only: bool) -> OrderRecord {
        OrderRecord {
            id: OrderId::from("order_5"),
            customer_name: "Paul".to_string(),
            flavors: vec![FlavorPortion::new("Schokolade", 2)],
            toppings: vec!["Waffeln".to_string()],
            drinks: vec!["Wasser".to_string(), "Kaffee".to_string()],
            coffee_type: Some("Cappuccino (mit Zucker)".to_string()),
            remarks: String::new(),
            created_at: Utc::now(),
            drinks_only,
        }
    }

    #[test]
    fn test_elapsed_label() {
        let now = Utc::now();
        assert_eq!(elapsed_label(now, now), "just now");
        assert_eq!(elapsed_label(now - Duration::seconds(59), now), "just now");
        assert_eq!(elapsed_label(now - Duration::seconds(60), now), "1 minute");
        assert_eq!(elapsed_label(now - Duration::seconds(125), now), "2 minutes");
        assert_eq!(elapsed_label(now + Duration::seconds(90), now), "just now");
    }

    #[test]
    fn test_orders_label() {
        assert_eq!(orders_label(0), "0 orders");
        assert_eq!(orders_label(1), "1 order");
        assert_eq!(orders_label(12), "12 orders");
    }

    #[test]
    fn test_card_sections() {
        let now = Utc::now();
        let card = OrderCard::from_record(&record(false), now);

        assert_eq!(card.ice_cream, vec!["2x Schokolade".to_string()]);
        assert_eq!(card.toppings, vec!["Waffeln".to_string()]);
        assert_eq!(
            card.drinks,
            vec!["Wasser".to_string(), "Cappuccino (mit Zucker)".to_string()]
        );
        assert_eq!(card.remarks, None);
        assert_eq!(card.placed_at.len(), 8);
    }

    #[test]
    fn test_drinks_only_card_hides_ice_cream() {
        let card = OrderCard::from_record(&record(true), Utc::now());
        assert!(!card.shows_ice_cream());
        assert!(card.toppings.is_empty());
        assert!(card.drinks_only);
    }

    #[test]
    fn test_plain_coffee_keeps_generic_label() {
        let mut plain = record(true);
        plain.coffee_type = None;
        plain.remarks = "bitte heiß".to_string();

        let card = OrderCard::from_record(&plain, Utc::now());
        assert_eq!(card.drinks, vec!["Wasser".to_string(), "Kaffee".to_string()]);
        assert_eq!(card.remarks.as_deref(), Some("bitte heiß"));
    }
}
