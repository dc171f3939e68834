//! # Order Draft
//!
//! The in-progress, unsubmitted order a customer edits at the counter.
//!
//! All field changes go through methods on [`OrderDraft`] so the draft can never reach a
//! state the form would not allow:
//!
//! - scoop counts never go below zero,
//! - drinks-only mode keeps scoops at zero and toppings empty,
//! - the coffee customization only exists while "Kaffee" is among the drinks.
//!
//! The coffee panel state is an explicit [`CoffeeSelection`] instead of a pair of
//! visibility flags, which makes "deselect Kaffee" a single total transition.

use crate::model::{FlavorPortion, NewOrder};
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Toppings offered on the form.
pub const TOPPINGS: [&str; 4] = ["Waffeln", "Schokoladensoße", "Sahne", "Bunte Streusel"];

/// Drinks offered on the form.
pub const DRINKS: [&str; 3] = ["Wasser", "Cola", COFFEE_DRINK];

/// The drink that unlocks the coffee customization panel.
pub const COFFEE_DRINK: &str = "Kaffee";

// =============================================================================
// 1. FLAVORS
// =============================================================================

/// Ice-cream flavors, in the fixed order they are listed and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Chocolate,
    Vanilla,
    Stracciatella,
}

impl Flavor {
    /// All flavors in declaration order.
    pub const ALL: [Flavor; 3] = [Flavor::Chocolate, Flavor::Vanilla, Flavor::Stracciatella];

    /// The name shown to customers and stored in the order record.
    pub fn display_name(self) -> &'static str {
        match self {
            Flavor::Chocolate => "Schokolade",
            Flavor::Vanilla => "Vanille",
            Flavor::Stracciatella => "Stracciatella",
        }
    }

    fn index(self) -> usize {
        match self {
            Flavor::Chocolate => 0,
            Flavor::Vanilla => 1,
            Flavor::Stracciatella => 2,
        }
    }
}

impl Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// "Kugel" for exactly one scoop, "Kugeln" otherwise.
pub fn scoop_label(count: u32) -> &'static str {
    if count == 1 {
        "Kugel"
    } else {
        "Kugeln"
    }
}

// =============================================================================
// 2. COFFEE
// =============================================================================

/// Coffee preparations offered once "Kaffee" is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoffeeType {
    Espresso,
    Cappuccino,
    LatteMacchiato,
    Americano,
    Crema,
    Lungo,
}

impl CoffeeType {
    pub const ALL: [CoffeeType; 6] = [
        CoffeeType::Espresso,
        CoffeeType::Cappuccino,
        CoffeeType::LatteMacchiato,
        CoffeeType::Americano,
        CoffeeType::Crema,
        CoffeeType::Lungo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CoffeeType::Espresso => "Espresso",
            CoffeeType::Cappuccino => "Cappuccino",
            CoffeeType::LatteMacchiato => "Latte Macchiato",
            CoffeeType::Americano => "Americano",
            CoffeeType::Crema => "Crema",
            CoffeeType::Lungo => "Lungo",
        }
    }
}

impl Display for CoffeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single coffee extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoffeeExtra {
    Sugar,
    Milk,
}

/// The set of chosen extras.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoffeeExtras {
    pub sugar: bool,
    pub milk: bool,
}

impl CoffeeExtras {
    pub fn is_empty(&self) -> bool {
        !self.sugar && !self.milk
    }

    pub fn contains(&self, extra: CoffeeExtra) -> bool {
        match extra {
            CoffeeExtra::Sugar => self.sugar,
            CoffeeExtra::Milk => self.milk,
        }
    }

    fn toggled(mut self, extra: CoffeeExtra) -> Self {
        match extra {
            CoffeeExtra::Sugar => self.sugar = !self.sugar,
            CoffeeExtra::Milk => self.milk = !self.milk,
        }
        self
    }

    /// Labels of the chosen extras, always sugar before milk.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::with_capacity(2);
        if self.sugar {
            labels.push("mit Zucker");
        }
        if self.milk {
            labels.push("mit Milch");
        }
        labels
    }
}

/// State of the coffee customization panel.
///
/// `WithExtras` always carries at least one extra: removing the last extra falls back
/// to `Selected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoffeeSelection {
    #[default]
    NoCoffee,
    Selected(CoffeeType),
    WithExtras(CoffeeType, CoffeeExtras),
}

impl CoffeeSelection {
    pub fn coffee_type(&self) -> Option<CoffeeType> {
        match self {
            CoffeeSelection::NoCoffee => None,
            CoffeeSelection::Selected(kind) | CoffeeSelection::WithExtras(kind, _) => Some(*kind),
        }
    }

    pub fn extras(&self) -> CoffeeExtras {
        match self {
            CoffeeSelection::WithExtras(_, extras) => *extras,
            _ => CoffeeExtras::default(),
        }
    }

    /// Picks a preparation. Extras chosen for a previous preparation are kept.
    fn with_type(self, kind: CoffeeType) -> Self {
        match self {
            CoffeeSelection::WithExtras(_, extras) => CoffeeSelection::WithExtras(kind, extras),
            _ => CoffeeSelection::Selected(kind),
        }
    }

    /// Flips one extra. Without a preparation there is nothing to customize.
    fn with_extra_toggled(self, extra: CoffeeExtra) -> Self {
        match self {
            CoffeeSelection::NoCoffee => CoffeeSelection::NoCoffee,
            CoffeeSelection::Selected(kind) => {
                CoffeeSelection::WithExtras(kind, CoffeeExtras::default().toggled(extra))
            }
            CoffeeSelection::WithExtras(kind, extras) => {
                let extras = extras.toggled(extra);
                if extras.is_empty() {
                    CoffeeSelection::Selected(kind)
                } else {
                    CoffeeSelection::WithExtras(kind, extras)
                }
            }
        }
    }

    /// The coffee line stored with the order, e.g. `"Espresso (mit Zucker, mit Milch)"`.
    pub fn label(&self) -> Option<String> {
        let kind = self.coffee_type()?;
        let extras = self.extras().labels();
        if extras.is_empty() {
            Some(kind.label().to_string())
        } else {
            Some(format!("{} ({})", kind.label(), extras.join(", ")))
        }
    }
}

// =============================================================================
// 3. THE DRAFT
// =============================================================================

/// The order a customer is putting together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    customer_name: String,
    scoops: [u32; 3],
    toppings: Vec<String>,
    drinks: Vec<String>,
    coffee: CoffeeSelection,
    drinks_only: bool,
    remarks: String,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors ---

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn scoops(&self, flavor: Flavor) -> u32 {
        self.scoops[flavor.index()]
    }

    pub fn total_scoops(&self) -> u64 {
        self.scoops.iter().map(|&n| u64::from(n)).sum()
    }

    pub fn toppings(&self) -> &[String] {
        &self.toppings
    }

    pub fn drinks(&self) -> &[String] {
        &self.drinks
    }

    pub fn has_drink(&self, drink: &str) -> bool {
        self.drinks.iter().any(|d| d == drink)
    }

    pub fn coffee(&self) -> CoffeeSelection {
        self.coffee
    }

    pub fn drinks_only(&self) -> bool {
        self.drinks_only
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    /// The coffee preparation list is shown while "Kaffee" is selected.
    pub fn shows_coffee_types(&self) -> bool {
        self.has_drink(COFFEE_DRINK)
    }

    /// Sugar and milk can be picked once a preparation is chosen.
    pub fn shows_coffee_extras(&self) -> bool {
        self.coffee != CoffeeSelection::NoCoffee
    }

    // --- Transitions ---

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    pub fn set_remarks(&mut self, remarks: impl Into<String>) {
        self.remarks = remarks.into();
    }

    /// Adds `delta` scoops (negative to remove), clamped at zero.
    ///
    /// Ignored in drinks-only mode.
    pub fn adjust_scoops(&mut self, flavor: Flavor, delta: i64) {
        let current = i64::from(self.scoops(flavor));
        self.set_scoops(flavor, current.saturating_add(delta));
    }

    /// Sets the scoop count, clamped to `0..=u32::MAX`.
    ///
    /// Ignored in drinks-only mode.
    pub fn set_scoops(&mut self, flavor: Flavor, count: i64) {
        if self.drinks_only {
            return;
        }
        self.scoops[flavor.index()] = count.clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// Adds or removes a topping. Ignored in drinks-only mode.
    pub fn toggle_topping(&mut self, topping: &str) {
        if self.drinks_only {
            return;
        }
        toggle_member(&mut self.toppings, topping);
    }

    /// Adds or removes a drink.
    ///
    /// Removing "Kaffee" drops the coffee customization entirely; adding it back starts
    /// from [`CoffeeSelection::NoCoffee`].
    pub fn toggle_drink(&mut self, drink: &str) {
        let added = toggle_member(&mut self.drinks, drink);
        if drink == COFFEE_DRINK && !added {
            self.coffee = CoffeeSelection::NoCoffee;
        }
    }

    /// Picks a coffee preparation. Has no effect unless "Kaffee" is selected.
    pub fn select_coffee_type(&mut self, kind: CoffeeType) {
        if self.shows_coffee_types() {
            self.coffee = self.coffee.with_type(kind);
        }
    }

    /// Flips sugar or milk. Has no effect until a preparation is chosen.
    pub fn toggle_coffee_extra(&mut self, extra: CoffeeExtra) {
        self.coffee = self.coffee.with_extra_toggled(extra);
    }

    /// Switches drinks-only mode.
    ///
    /// Turning it on clears all scoops and toppings. Turning it off leaves everything as is.
    pub fn toggle_drinks_only(&mut self) {
        self.drinks_only = !self.drinks_only;
        if self.drinks_only {
            self.scoops = [0; 3];
            self.toppings.clear();
        }
    }

    // --- Serialization ---

    /// Scoops per flavor in fixed flavor order, zero counts dropped.
    pub fn flavor_portions(&self) -> Vec<FlavorPortion> {
        if self.drinks_only {
            return Vec::new();
        }
        Flavor::ALL
            .iter()
            .filter(|flavor| self.scoops(**flavor) > 0)
            .map(|flavor| FlavorPortion::new(flavor.display_name(), self.scoops(*flavor)))
            .collect()
    }

    /// Builds the record input submitted to the datastore.
    pub fn to_new_order(&self, created_at: DateTime<Utc>) -> NewOrder {
        NewOrder {
            customer_name: self.customer_name.clone(),
            flavors: self.flavor_portions(),
            toppings: if self.drinks_only {
                Vec::new()
            } else {
                self.toppings.clone()
            },
            drinks: self.drinks.clone(),
            coffee_type: self.coffee.label(),
            remarks: self.remarks.clone(),
            created_at,
            drinks_only: self.drinks_only,
        }
    }
}

/// Symmetric add/remove that keeps insertion order. Returns `true` if the value was added.
fn toggle_member(items: &mut Vec<String>, value: &str) -> bool {
    if let Some(pos) = items.iter().position(|item| item == value) {
        items.remove(pos);
        false
    } else {
        items.push(value.to_string());
        true
    }
}
